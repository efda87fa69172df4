//! Holt-Winters recursions with damped additive trend and additive seasonality
//!
//! ```text
//! Fitted:   ŷ_t  = l + φb + s_i
//! Level:    l'   = α(y_t − s_i) + (1 − α)(l + φb)
//! Trend:    b'   = β(l' − l) + (1 − β)φb
//! Season:   s_i' = γ(y_t − l') + (1 − γ)s_i
//! Forecast: ŷ_{T+h} = l_T + (φ + φ² + … + φ^h)b_T + s_{(T+h) mod m}
//! ```
//!
//! where `i = t mod m` is the season slot of observation `t`.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Smoothing parameters of a damped additive Holt-Winters model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoltWintersParams {
    /// Level smoothing
    pub alpha: f64,
    /// Trend smoothing
    pub beta: f64,
    /// Seasonal smoothing
    pub gamma: f64,
    /// Trend damping
    pub phi: f64,
}

impl HoltWintersParams {
    /// Create a validated parameter set
    pub fn new(alpha: f64, beta: f64, gamma: f64, phi: f64) -> Result<Self> {
        let params = Self {
            alpha,
            beta,
            gamma,
            phi,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that every parameter lies in its admissible range
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MathError::InvalidInput(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if !self.phi.is_finite() || self.phi <= 0.0 || self.phi > 1.0 {
            return Err(MathError::InvalidInput(format!(
                "phi must be in (0, 1], got {}",
                self.phi
            )));
        }

        Ok(())
    }
}

/// Level, trend and per-slot seasonal components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingState {
    pub level: f64,
    pub trend: f64,
    /// Seasonal component for each slot `t mod m`
    pub seasonals: Vec<f64>,
}

impl SmoothingState {
    /// Heuristic initial state from the first two seasons of `data`
    ///
    /// The level is the mean of the first season, the trend is the
    /// per-step change between the first two season means, and each
    /// seasonal component is the first-season deviation from that level.
    pub fn initial(data: &[f64], period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(format!(
                "Seasonal period must be at least 2, got {}",
                period
            )));
        }
        if data.len() < 2 * period {
            return Err(MathError::InsufficientData(format!(
                "Need at least {} observations (two seasons), got {}",
                2 * period,
                data.len()
            )));
        }

        let first = &data[..period];
        let second = &data[period..2 * period];
        let m = period as f64;

        let first_mean = first.iter().sum::<f64>() / m;
        let second_mean = second.iter().sum::<f64>() / m;

        Ok(Self {
            level: first_mean,
            trend: (second_mean - first_mean) / m,
            seasonals: first.iter().map(|v| v - first_mean).collect(),
        })
    }

    /// Number of seasonal slots
    pub fn period(&self) -> usize {
        self.seasonals.len()
    }

    fn is_finite(&self) -> bool {
        self.level.is_finite()
            && self.trend.is_finite()
            && self.seasonals.iter().all(|s| s.is_finite())
    }
}

/// Outcome of running the recursions over a series
#[derive(Debug, Clone)]
pub struct SmoothingRun {
    /// One-step-ahead fitted values, one per observation
    pub fitted: Vec<f64>,
    /// Sum of squared one-step errors
    pub sse: f64,
    /// State after the last observation
    pub state: SmoothingState,
    /// Season slot of the first step past the data
    pub next_slot: usize,
}

impl SmoothingRun {
    /// Number of observations smoothed
    pub fn observations(&self) -> usize {
        self.fitted.len()
    }

    /// Seasonal components reordered so index `k` belongs to step `k + 1`
    /// past the last observation
    pub fn seasonals_ahead(&self) -> Vec<f64> {
        let m = self.state.period();
        (0..m)
            .map(|k| self.state.seasonals[(self.next_slot + k) % m])
            .collect()
    }

    /// Forecast `horizon` steps past the last observation
    pub fn forecast(&self, phi: f64, horizon: usize) -> Result<Vec<f64>> {
        forecast(
            self.state.level,
            self.state.trend,
            phi,
            &self.seasonals_ahead(),
            horizon,
        )
    }
}

/// Run the recursions over `data` starting from the heuristic initial state
pub fn smooth(data: &[f64], period: usize, params: &HoltWintersParams) -> Result<SmoothingRun> {
    params.validate()?;
    if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Non-finite observation at index {}",
            pos
        )));
    }

    let initial = SmoothingState::initial(data, period)?;
    let run = smooth_from(data, initial, params);

    if !run.sse.is_finite() || !run.state.is_finite() {
        return Err(MathError::CalculationError(
            "Smoothing diverged to a non-finite state".to_string(),
        ));
    }

    Ok(run)
}

/// Run the recursions from an explicit initial state
///
/// Inputs are assumed validated; a diverging run shows up as a non-finite
/// `sse`.
pub(crate) fn smooth_from(
    data: &[f64],
    initial: SmoothingState,
    params: &HoltWintersParams,
) -> SmoothingRun {
    let HoltWintersParams {
        alpha,
        beta,
        gamma,
        phi,
    } = *params;
    let m = initial.period();
    let mut state = initial;
    let mut fitted = Vec::with_capacity(data.len());
    let mut sse = 0.0;

    for (t, &y) in data.iter().enumerate() {
        let slot = t % m;
        let season = state.seasonals[slot];
        let damped = phi * state.trend;

        let prediction = state.level + damped + season;
        fitted.push(prediction);
        sse += (y - prediction).powi(2);

        let level = alpha * (y - season) + (1.0 - alpha) * (state.level + damped);
        state.trend = beta * (level - state.level) + (1.0 - beta) * damped;
        state.seasonals[slot] = gamma * (y - level) + (1.0 - gamma) * season;
        state.level = level;
    }

    SmoothingRun {
        next_slot: data.len() % m,
        fitted,
        sse,
        state,
    }
}

/// `φ + φ² + … + φ^h`, the trend multiplier `h` steps ahead
pub fn damped_trend_sum(phi: f64, horizon: usize) -> f64 {
    if (phi - 1.0).abs() < f64::EPSILON {
        return horizon as f64;
    }
    phi * (1.0 - phi.powi(horizon as i32)) / (1.0 - phi)
}

/// Forecast from a final state
///
/// `seasonals_ahead[k]` is the seasonal component for step `k + 1`; it
/// repeats with period `seasonals_ahead.len()`.
pub fn forecast(
    level: f64,
    trend: f64,
    phi: f64,
    seasonals_ahead: &[f64],
    horizon: usize,
) -> Result<Vec<f64>> {
    if horizon == 0 {
        return Err(MathError::InvalidInput(
            "Forecast horizon must be at least 1".to_string(),
        ));
    }
    if seasonals_ahead.is_empty() {
        return Err(MathError::InvalidInput(
            "Seasonal components are empty".to_string(),
        ));
    }

    let m = seasonals_ahead.len();
    let mut values = Vec::with_capacity(horizon);

    for h in 1..=horizon {
        let value = level + damped_trend_sum(phi, h) * trend + seasonals_ahead[(h - 1) % m];
        if !value.is_finite() {
            return Err(MathError::CalculationError(format!(
                "Forecast became non-finite at step {}",
                h
            )));
        }
        values.push(value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seasonal_series(seasons: usize, period: usize) -> Vec<f64> {
        (0..seasons * period)
            .map(|t| {
                let phase = (t % period) as f64 / period as f64 * std::f64::consts::TAU;
                70.0 + 10.0 * phase.sin()
            })
            .collect()
    }

    #[test]
    fn test_params_validation() {
        assert!(HoltWintersParams::new(0.5, 0.1, 0.2, 0.98).is_ok());
        assert!(HoltWintersParams::new(1.5, 0.1, 0.2, 0.98).is_err());
        assert!(HoltWintersParams::new(0.5, -0.1, 0.2, 0.98).is_err());
        assert!(HoltWintersParams::new(0.5, 0.1, f64::NAN, 0.98).is_err());
        assert!(HoltWintersParams::new(0.5, 0.1, 0.2, 0.0).is_err());
        assert!(HoltWintersParams::new(0.5, 0.1, 0.2, 1.0).is_ok());
    }

    #[test]
    fn test_initial_state() {
        let data = [1.0, 3.0, 5.0, 7.0];
        let state = SmoothingState::initial(&data, 2).unwrap();

        assert_relative_eq!(state.level, 2.0);
        assert_relative_eq!(state.trend, 2.0);
        assert_eq!(state.seasonals, vec![-1.0, 1.0]);
    }

    #[test]
    fn test_initial_state_needs_two_seasons() {
        let data = [1.0, 2.0, 3.0];
        assert!(matches!(
            SmoothingState::initial(&data, 2),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            SmoothingState::initial(&data, 1),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_pure_seasonal_series_is_reproduced() {
        let period = 12;
        let data = seasonal_series(4, period);
        let params = HoltWintersParams::new(0.3, 0.05, 0.1, 0.98).unwrap();
        let run = smooth(&data, period, &params).unwrap();

        assert_eq!(run.observations(), data.len());
        assert_relative_eq!(run.sse, 0.0, epsilon = 1e-9);

        let ahead = run.forecast(params.phi, period).unwrap();
        for (h, value) in ahead.iter().enumerate() {
            assert_relative_eq!(*value, data[h], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_seasonals_ahead_rotation() {
        let period = 4;
        let mut data = seasonal_series(2, period);
        data.push(70.0);
        let params = HoltWintersParams::new(0.2, 0.1, 0.1, 0.9).unwrap();
        let run = smooth(&data, period, &params).unwrap();

        assert_eq!(run.next_slot, 1);
        let ahead = run.seasonals_ahead();
        assert_eq!(ahead[0], run.state.seasonals[1]);
        assert_eq!(ahead[3], run.state.seasonals[0]);
    }

    #[test]
    fn test_damped_trend_sum() {
        assert_relative_eq!(damped_trend_sum(1.0, 5), 5.0);
        assert_relative_eq!(damped_trend_sum(0.5, 1), 0.5);
        assert_relative_eq!(damped_trend_sum(0.5, 3), 0.875);
    }

    #[test]
    fn test_forecast_trend_is_damped() {
        let values = forecast(10.0, 1.0, 0.5, &[0.0], 3).unwrap();
        assert_relative_eq!(values[0], 10.5);
        assert_relative_eq!(values[1], 10.75);
        assert_relative_eq!(values[2], 10.875);
        assert_relative_eq!(values[2], 10.0 + damped_trend_sum(0.5, 3));
    }

    #[test]
    fn test_forecast_rejects_zero_horizon() {
        assert!(forecast(10.0, 0.0, 0.9, &[0.0], 0).is_err());
        assert!(forecast(10.0, 0.0, 0.9, &[], 1).is_err());
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let mut data = seasonal_series(2, 4);
        data[3] = f64::NAN;
        let params = HoltWintersParams::new(0.2, 0.1, 0.1, 0.9).unwrap();
        assert!(matches!(
            smooth(&data, 4, &params),
            Err(MathError::InvalidInput(_))
        ));
    }
}
