//! Forecasting models for heart-rate series

use crate::data::HeartRateSeries;
use crate::error::{ForecastError, Result};
use crate::utils::{future_timestamps, rmse, train_test_split};
use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values
    pub(crate) values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Timestamps (optional)
    pub(crate) timestamps: Option<Vec<DateTime<Utc>>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            timestamps: None,
        })
    }

    /// Attach one timestamp per value, spaced `interval` apart after `origin`
    pub fn with_timestamps(mut self, origin: DateTime<Utc>, interval: Duration) -> Result<Self> {
        self.timestamps = Some(future_timestamps(origin, self.horizons, interval)?);
        Ok(self)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the timestamps, if available
    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Value at the furthest horizon
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// A fitted model that can be queried for future values
///
/// This is the whole surface the serving side relies on: where the
/// training data ended, and what the model expects `horizons` steps later.
pub trait TrainedForecastModel: Debug + Send + Sync {
    /// Generate forecast for future periods
    ///
    /// The last value belongs to `horizons` intervals past
    /// [`training_end_time`](Self::training_end_time).
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// Timestamp of the last observation used in fitting
    fn training_end_time(&self) -> DateTime<Utc>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a heart-rate series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a regularly spaced series
    fn train(&self, data: &HeartRateSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Out-of-sample error of a model fit on the head of a series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldoutScore {
    /// Observations used for fitting
    pub train_len: usize,
    /// Observations forecast and scored
    pub test_len: usize,
    pub rmse: f64,
}

/// Fit `model` on the leading `1 - test_ratio` share of `series` and score
/// its forecast over the trailing share
pub fn evaluate_holdout<M: ForecastModel>(
    model: &M,
    series: &HeartRateSeries,
    test_ratio: f64,
) -> Result<HoldoutScore> {
    let (train, test) = train_test_split(series.values(), test_ratio);
    if test.is_empty() {
        return Err(ForecastError::ValidationError(format!(
            "Holdout ratio {} leaves no test data",
            test_ratio
        )));
    }

    let head = HeartRateSeries::new(series.start_time(), series.interval_secs(), train)?;
    let trained = model.train(&head)?;
    let forecast = trained.forecast(test.len())?;

    Ok(HoldoutScore {
        train_len: head.len(),
        test_len: test.len(),
        rmse: rmse(forecast.values(), &test)?,
    })
}

pub mod holt_winters;
