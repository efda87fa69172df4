//! Error types for the hr_forecast crate

use smoothing_math::MathError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the hr_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A model artifact could not be read or is not usable
    #[error("Artifact error ({path}): {reason}")]
    ArtifactError { path: PathBuf, reason: String },

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Build an artifact error for `path`
    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ForecastError::ArtifactError {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
