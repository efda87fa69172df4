//! # HR Forecast
//!
//! Heart-rate forecasting with a damped additive Holt-Winters model.
//!
//! ## Features
//!
//! - Heart-rate sample loading from CSV and resampling to a fixed interval
//! - Holt-Winters fitting with daily seasonality (288 five-minute slots)
//! - A versioned JSON model artifact read back by the serving side
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hr_forecast::data::{DataLoader, HeartRateSeries};
//! use hr_forecast::models::holt_winters::HoltWinters;
//! use hr_forecast::{ForecastModel, ModelArtifact, DAILY_SEASONAL_PERIODS, STEP_INTERVAL_SECS};
//!
//! let samples = DataLoader::from_csv("heart_rate.csv")?;
//! let series = HeartRateSeries::resample(&samples, STEP_INTERVAL_SECS)?;
//!
//! let trained = HoltWinters::new(DAILY_SEASONAL_PERIODS)?.train(&series)?;
//! ModelArtifact::new(trained).save("hw_model.json")?;
//! # Ok::<(), hr_forecast::ForecastError>(())
//! ```

pub mod artifact;
pub mod data;
pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::artifact::{ArtifactFile, ModelArtifact, DEFAULT_ARTIFACT_FILE};
pub use crate::data::{DataLoader, HeartRateSample, HeartRateSeries};
pub use crate::error::ForecastError;
pub use crate::models::holt_winters::{HoltWinters, TrainedHoltWinters};
pub use crate::models::{
    evaluate_holdout, ForecastModel, ForecastResult, HoldoutScore, TrainedForecastModel,
};

/// Model-native sampling interval: five minutes
pub const STEP_INTERVAL_SECS: i64 = 300;

/// Five-minute slots in one day
pub const DAILY_SEASONAL_PERIODS: usize = 288;

/// Crate version, logged by the training binary
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
