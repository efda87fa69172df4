//! Conversion from wall-clock time to forecast horizon

use chrono::{DateTime, Utc};
use hr_forecast::STEP_INTERVAL_SECS;

/// Whole model intervals from `model_end_time` to `target_time`, at least 1
///
/// The elapsed time is truncated toward zero, so a target inside the first
/// interval, at the end time, or before it all map to one step.
pub fn steps_ahead(target_time: DateTime<Utc>, model_end_time: DateTime<Utc>) -> usize {
    let elapsed = (target_time - model_end_time).num_seconds();
    let steps = elapsed / STEP_INTERVAL_SECS;
    steps.max(1) as usize
}
