//! Error types for the hr_service crate

use hr_forecast::ForecastError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The model artifact could not be loaded; the next request retries
    #[error("Model load failed: {0}")]
    ModelLoad(#[source] ForecastError),

    /// The loaded model failed to produce a forecast
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("Forecast for {0} steps returned no values")]
    EmptyForecast(usize),

    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
