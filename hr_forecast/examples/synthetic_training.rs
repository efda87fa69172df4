//! Fit a model on a week of synthetic heart-rate data and write the artifact
//!
//! ```text
//! cargo run -p hr_forecast --example synthetic_training -- hw_model.json
//! ```

use chrono::{Duration, TimeZone, Utc};
use hr_forecast::{
    ForecastModel, HeartRateSample, HeartRateSeries, HoltWinters, ModelArtifact,
    DAILY_SEASONAL_PERIODS, DEFAULT_ARTIFACT_FILE, STEP_INTERVAL_SECS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ARTIFACT_FILE.to_string());

    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 3.0)?;
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .ok_or("invalid start time")?;

    // One reading a minute for a week: low at night, a bump for an evening run
    let samples: Vec<HeartRateSample> = (0..7 * 24 * 60)
        .map(|minute| {
            let hour = (minute % (24 * 60)) as f64 / 60.0;
            let circadian = 10.0 * ((hour - 4.0) / 24.0 * std::f64::consts::TAU).sin();
            let workout = if (18.0..19.0).contains(&hour) { 45.0 } else { 0.0 };
            HeartRateSample {
                datetime: start + Duration::minutes(minute),
                heart_rate: 68.0 + circadian + workout + noise.sample(&mut rng),
            }
        })
        .collect();

    let series = HeartRateSeries::resample(&samples, STEP_INTERVAL_SECS)?;
    println!("Resampled {} readings into {} slots", samples.len(), series.len());

    let trained = HoltWinters::new(DAILY_SEASONAL_PERIODS)?.train(&series)?;
    let params = trained.params();
    println!(
        "alpha={:.3} beta={:.3} gamma={:.3} phi={:.3} AIC={:.2}",
        params.alpha,
        params.beta,
        params.gamma,
        params.phi,
        trained.aic()
    );

    let next_hour = trained.forecast_with_timestamps(12)?;
    for (ts, value) in next_hour
        .timestamps()
        .unwrap_or_default()
        .iter()
        .zip(next_hour.values())
    {
        println!("{}  {:.1} bpm", ts.format("%a %H:%M"), value);
    }

    ModelArtifact::new(trained).save(&output)?;
    println!("Model saved to {}", output);
    Ok(())
}
