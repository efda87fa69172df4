//! # Heartcast
//!
//! Heart-rate forecasting from a pre-fit Holt-Winters model.
//!
//! The workspace is split the same way the work is:
//!
//! - [`smoothing_math`]: Holt-Winters recursions and parameter search
//! - [`hr_forecast`]: sample loading, model training and the model artifact
//! - [`hr_service`]: model cache, step calculation and the forecast endpoint
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use heartcast_workspace::service::steps_ahead;
//!
//! let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! assert_eq!(steps_ahead(end + Duration::hours(1), end), 12);
//! assert_eq!(steps_ahead(end - Duration::hours(1), end), 1);
//! ```

pub use hr_forecast as forecast;
pub use hr_service as service;
pub use smoothing_math as math;

pub use hr_forecast::{ArtifactFile, ModelArtifact, TrainedHoltWinters};
pub use hr_service::{ForecastHandler, ForecastReply, ForecastRequest, ModelCache};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_reexports_resolve() {
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(service::steps_ahead(end + Duration::minutes(10), end), 2);
        assert_eq!(forecast::STEP_INTERVAL_SECS, 300);
        assert!(math::HoltWintersParams::new(0.5, 0.1, 0.1, 0.9).is_ok());
    }
}
