//! Holt-Winters model: damped additive trend, additive seasonality

use crate::data::HeartRateSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::STEP_INTERVAL_SECS;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use smoothing_math::holt_winters::{self, HoltWintersParams, SmoothingRun};
use smoothing_math::optimize::{fit_params, ParamSearch};

/// Holt-Winters model configuration
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Name of the model
    name: String,
    /// Observations per season
    seasonal_periods: usize,
    /// Fixed smoothing parameters; searched for when absent
    params: Option<HoltWintersParams>,
    /// Search used when parameters are not fixed
    search: ParamSearch,
}

/// Fitted Holt-Winters model, serializable as a model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedHoltWinters {
    name: String,
    seasonal_periods: usize,
    interval_secs: i64,
    params: HoltWintersParams,
    level: f64,
    trend: f64,
    /// Seasonal components, index `k` belongs to step `k + 1` past the end
    seasonals: Vec<f64>,
    training_start: DateTime<Utc>,
    training_end: DateTime<Utc>,
    observations: usize,
    sse: f64,
    aic: f64,
}

impl HoltWinters {
    /// Create a damped additive model with `seasonal_periods` per season
    pub fn new(seasonal_periods: usize) -> Result<Self> {
        if seasonal_periods < 2 {
            return Err(ForecastError::InvalidParameter(
                "Seasonal periods must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters (damped additive, m={})", seasonal_periods),
            seasonal_periods,
            params: None,
            search: ParamSearch::default(),
        })
    }

    /// Pin the smoothing parameters instead of searching for them
    pub fn with_params(mut self, params: HoltWintersParams) -> Result<Self> {
        params.validate()?;
        self.params = Some(params);
        Ok(self)
    }

    /// Replace the parameter search configuration
    pub fn with_search(mut self, search: ParamSearch) -> Self {
        self.search = search;
        self
    }

    pub fn seasonal_periods(&self) -> usize {
        self.seasonal_periods
    }
}

impl ForecastModel for HoltWinters {
    type Trained = TrainedHoltWinters;

    fn train(&self, data: &HeartRateSeries) -> Result<Self::Trained> {
        if data.interval_secs() != STEP_INTERVAL_SECS {
            return Err(ForecastError::DataError(format!(
                "Series must be sampled every {} seconds, got {}",
                STEP_INTERVAL_SECS,
                data.interval_secs()
            )));
        }

        let values = data.values();
        if values.len() < 2 * self.seasonal_periods {
            return Err(ForecastError::DataError(format!(
                "Need at least two seasons ({} observations), got {}",
                2 * self.seasonal_periods,
                values.len()
            )));
        }

        let (params, run) = match self.params {
            Some(params) => (
                params,
                holt_winters::smooth(values, self.seasonal_periods, &params)?,
            ),
            None => fit_params(values, self.seasonal_periods, &self.search)?,
        };

        TrainedHoltWinters::from_run(self, data, params, &run)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    fn from_run(
        model: &HoltWinters,
        data: &HeartRateSeries,
        params: HoltWintersParams,
        run: &SmoothingRun,
    ) -> Result<Self> {
        let observations = run.observations();
        let trained = Self {
            name: model.name.clone(),
            seasonal_periods: model.seasonal_periods,
            interval_secs: data.interval_secs(),
            params,
            level: run.state.level,
            trend: run.state.trend,
            seasonals: run.seasonals_ahead(),
            training_start: data.start_time(),
            training_end: data.end_time(),
            observations,
            sse: run.sse,
            aic: aic(run.sse, observations, model.seasonal_periods),
        };
        trained.validate()?;
        Ok(trained)
    }

    /// Check internal consistency of a (possibly deserialized) model
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.seasonal_periods < 2 {
            return Err(ForecastError::ValidationError(format!(
                "Seasonal periods must be at least 2, got {}",
                self.seasonal_periods
            )));
        }
        if self.seasonals.len() != self.seasonal_periods {
            return Err(ForecastError::ValidationError(format!(
                "Expected {} seasonal components, found {}",
                self.seasonal_periods,
                self.seasonals.len()
            )));
        }
        if self.interval_secs != STEP_INTERVAL_SECS {
            return Err(ForecastError::ValidationError(format!(
                "Model interval must be {} seconds, got {}",
                STEP_INTERVAL_SECS, self.interval_secs
            )));
        }
        if !self.level.is_finite()
            || !self.trend.is_finite()
            || self.seasonals.iter().any(|s| !s.is_finite())
        {
            return Err(ForecastError::ValidationError(
                "Model state contains non-finite values".to_string(),
            ));
        }
        if self.training_end < self.training_start {
            return Err(ForecastError::ValidationError(
                "Training end precedes training start".to_string(),
            ));
        }
        Ok(())
    }

    pub fn params(&self) -> &HoltWintersParams {
        &self.params
    }

    pub fn seasonal_periods(&self) -> usize {
        self.seasonal_periods
    }

    /// Spacing between forecast steps
    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_secs)
    }

    pub fn training_start(&self) -> DateTime<Utc> {
        self.training_start
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Sum of squared one-step errors over the training data
    pub fn sse(&self) -> f64 {
        self.sse
    }

    /// Akaike information criterion of the fit
    pub fn aic(&self) -> f64 {
        self.aic
    }

    /// Forecast with one timestamp per step after the training end
    pub fn forecast_with_timestamps(&self, horizons: usize) -> Result<ForecastResult> {
        self.forecast(horizons)?.with_timestamps(self.training_end, self.interval())
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        let values = holt_winters::forecast(
            self.level,
            self.trend,
            self.params.phi,
            &self.seasonals,
            horizons,
        )?;

        ForecastResult::new(values, horizons)
    }

    fn training_end_time(&self) -> DateTime<Utc> {
        self.training_end
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// `n ln(SSE / n) + 2k` with k counting the four smoothing parameters plus
/// the initial level, trend and seasonal states
fn aic(sse: f64, observations: usize, seasonal_periods: usize) -> f64 {
    let n = observations as f64;
    let k = (4 + 2 + seasonal_periods) as f64;
    n * (sse.max(f64::MIN_POSITIVE) / n).ln() + 2.0 * k
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn daily_series(days: usize, period: usize) -> HeartRateSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let values = (0..days * period)
            .map(|t| {
                let phase = (t % period) as f64 / period as f64 * std::f64::consts::TAU;
                72.0 - 8.0 * phase.cos()
            })
            .collect();
        HeartRateSeries::new(start, 300, values).unwrap()
    }

    #[test]
    fn test_train_with_fixed_params() {
        let data = daily_series(3, 12);
        let params = HoltWintersParams::new(0.3, 0.05, 0.1, 0.98).unwrap();
        let model = HoltWinters::new(12).unwrap().with_params(params).unwrap();
        let trained = model.train(&data).unwrap();

        assert_eq!(trained.params(), &params);
        assert_eq!(trained.observations(), 36);
        assert_eq!(trained.training_end_time(), data.end_time());
        assert!(trained.validate().is_ok());

        let forecast = trained.forecast_with_timestamps(12).unwrap();
        assert_eq!(forecast.horizons(), 12);
        for (h, value) in forecast.values().iter().enumerate() {
            assert_relative_eq!(*value, data.values()[h], epsilon = 1e-6);
        }
        let stamps = forecast.timestamps().unwrap();
        assert_eq!(stamps[0], data.end_time() + Duration::minutes(5));
    }

    #[test]
    fn test_train_searches_params() {
        let data = daily_series(3, 8);
        let trained = HoltWinters::new(8).unwrap().train(&data).unwrap();
        assert!(trained.params().validate().is_ok());
        assert!(trained.aic().is_finite());
    }

    #[test]
    fn test_with_search_replaces_default_grid() {
        let data = daily_series(2, 4);
        let search = ParamSearch {
            smoothing_grid: Vec::new(),
            ..ParamSearch::default()
        };
        let model = HoltWinters::new(4).unwrap().with_search(search);
        assert!(matches!(model.train(&data), Err(ForecastError::MathError(_))));
    }

    #[test]
    fn test_forecast_leaves_timestamps_off() {
        let data = daily_series(2, 4);
        let trained = HoltWinters::new(4).unwrap().train(&data).unwrap();
        assert!(trained.forecast(3).unwrap().timestamps().is_none());
    }

    #[test]
    fn test_train_rejects_other_intervals() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let data = HeartRateSeries::new(start, 60, vec![70.0; 16]).unwrap();
        let model = HoltWinters::new(4).unwrap();
        assert!(matches!(model.train(&data), Err(ForecastError::DataError(_))));
    }

    #[test]
    fn test_validate_catches_interval_mismatch() {
        let data = daily_series(2, 4);
        let mut trained = HoltWinters::new(4).unwrap().train(&data).unwrap();
        trained.interval_secs = 60;
        let err = trained.validate().unwrap_err();
        assert!(err.to_string().contains("Model interval must be 300 seconds"));
    }

    #[test]
    fn test_train_needs_two_seasons() {
        let data = daily_series(1, 12);
        let model = HoltWinters::new(12).unwrap();
        assert!(matches!(model.train(&data), Err(ForecastError::DataError(_))));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(HoltWinters::new(1).is_err());
        let bad = HoltWintersParams {
            alpha: 2.0,
            beta: 0.1,
            gamma: 0.1,
            phi: 0.9,
        };
        assert!(HoltWinters::new(12).unwrap().with_params(bad).is_err());
    }

    #[test]
    fn test_validate_catches_seasonal_mismatch() {
        let data = daily_series(2, 4);
        let mut trained = HoltWinters::new(4).unwrap().train(&data).unwrap();
        trained.seasonals.pop();
        assert!(trained.validate().is_err());
    }
}
