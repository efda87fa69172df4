//! # Smoothing Math
//!
//! Numeric kernels for exponential smoothing of seasonal series.
//! This crate provides the Holt-Winters recursions (damped additive trend,
//! additive seasonality) and a deterministic search for their smoothing
//! parameters.

use thiserror::Error;

pub mod holt_winters;
pub mod optimize;

pub use holt_winters::{damped_trend_sum, HoltWintersParams, SmoothingRun, SmoothingState};
pub use optimize::{fit_params, ParamSearch};

/// Errors that can occur in smoothing calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for smoothing math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_detail() {
        let err = MathError::InsufficientData("need 576 observations".to_string());
        assert_eq!(
            err.to_string(),
            "Insufficient data for calculation: need 576 observations"
        );
    }
}
