//! Utility functions for the hr_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// Round `value` to `decimals` places, ties to the even neighbour
///
/// Ties are judged on the exact binary value of `value`, as Python's
/// `round` does: `72.25` is a true tie and goes to `72.2`, while `72.35`
/// is stored slightly below the half and goes to `72.3`.
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    // Exact error of the product; nonzero when the multiplication moved the value
    let residual = value.mul_add(scale, -scaled);

    let rounded = if scaled.fract().abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };
    rounded / scale
}

/// Create future timestamps spaced `interval` apart after `last_timestamp`
pub fn future_timestamps(
    last_timestamp: DateTime<Utc>,
    horizon: usize,
    interval: Duration,
) -> Result<Vec<DateTime<Utc>>> {
    if interval <= Duration::zero() {
        return Err(ForecastError::ValidationError(format!(
            "Interval must be positive, got {}",
            interval
        )));
    }

    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;

    for _ in 0..horizon {
        current += interval;
        timestamps.push(current);
    }

    Ok(timestamps)
}

/// Split a series into training and holdout parts
pub fn train_test_split(data: &[f64], test_ratio: f64) -> (Vec<f64>, Vec<f64>) {
    if data.is_empty() || test_ratio <= 0.0 || test_ratio >= 1.0 {
        return (data.to_vec(), Vec::new());
    }

    let test_size = (data.len() as f64 * test_ratio).round() as usize;
    let train_size = data.len() - test_size;

    (data[..train_size].to_vec(), data[train_size..].to_vec())
}

/// Root mean squared error between two equally long series
pub fn rmse(forecast: &[f64], actual: &[f64]) -> Result<f64> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::ValidationError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let mse = forecast
        .iter()
        .zip(actual)
        .map(|(f, a)| (a - f).powi(2))
        .sum::<f64>()
        / forecast.len() as f64;

    Ok(mse.sqrt())
}
