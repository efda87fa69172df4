use approx::assert_relative_eq;
use chrono::{Duration, TimeZone, Utc};
use hr_forecast::models::holt_winters::HoltWinters;
use hr_forecast::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use hr_forecast::{evaluate_holdout, ForecastError, HeartRateSeries};
use smoothing_math::HoltWintersParams;

fn create_test_series(days: usize, period: usize, drift: f64) -> HeartRateSeries {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let values = (0..days * period)
        .map(|t| {
            let slot = (t % period) as f64;
            let daily = if slot < period as f64 / 2.0 { -6.0 } else { 6.0 };
            70.0 + daily + drift * t as f64
        })
        .collect();
    HeartRateSeries::new(start, 300, values).unwrap()
}

#[test]
fn test_holt_winters_forecast_shape() {
    let data = create_test_series(4, 24, 0.0);
    let trained = HoltWinters::new(24).unwrap().train(&data).unwrap();

    let forecast = trained.forecast_with_timestamps(30).unwrap();
    assert_eq!(forecast.horizons(), 30);
    assert_eq!(forecast.values().len(), 30);
    assert_eq!(
        forecast.timestamps().unwrap().last().copied(),
        Some(data.end_time() + Duration::minutes(5 * 30))
    );
}

#[test]
fn test_forecast_prefix_is_stable() {
    // Asking for more steps never changes the nearer ones
    let data = create_test_series(3, 12, 0.02);
    let trained = HoltWinters::new(12).unwrap().train(&data).unwrap();

    let short = trained.forecast(5).unwrap();
    let long = trained.forecast(40).unwrap();
    assert_eq!(&long.values()[..5], short.values());
}

#[test]
fn test_damped_trend_levels_off() {
    let data = create_test_series(3, 12, 0.5);
    let params = HoltWintersParams::new(0.5, 0.3, 0.1, 0.8).unwrap();
    let trained = HoltWinters::new(12)
        .unwrap()
        .with_params(params)
        .unwrap()
        .train(&data)
        .unwrap();

    // Same season slot, nine and ten seasons out
    let forecast = trained.forecast(12 * 10).unwrap();
    let values = forecast.values();
    assert_relative_eq!(values[12 * 9 - 1], values[12 * 10 - 1], epsilon = 1e-3);
}

#[test]
fn test_training_end_time_is_last_observation() {
    let data = create_test_series(2, 12, 0.0);
    let trained = HoltWinters::new(12).unwrap().train(&data).unwrap();
    assert_eq!(
        trained.training_end_time(),
        Utc.with_ymd_and_hms(2023, 1, 1, 1, 55, 0).unwrap()
    );
}

#[test]
fn test_forecast_result_operations() {
    let values = vec![71.0, 72.0, 73.0];
    let forecast = ForecastResult::new(values.clone(), 3).unwrap();

    assert_eq!(forecast.horizons(), 3);
    assert_eq!(forecast.values(), &values);
    assert_eq!(forecast.last_value(), Some(73.0));
}

#[test]
fn test_zero_horizon_is_rejected() {
    let data = create_test_series(2, 6, 0.0);
    let trained = HoltWinters::new(6).unwrap().train(&data).unwrap();
    assert!(trained.forecast(0).is_err());
}

#[test]
fn test_model_parameter_validation() {
    assert!(HoltWinters::new(0).is_err());
    assert!(HoltWinters::new(1).is_err());
    assert!(HoltWinters::new(288).is_ok());
}

#[test]
fn test_holdout_scores_tail_forecast() {
    let data = create_test_series(4, 12, 0.0);
    let score = evaluate_holdout(&HoltWinters::new(12).unwrap(), &data, 0.25).unwrap();

    assert_eq!(score.train_len, 36);
    assert_eq!(score.test_len, 12);
    // A repeating pattern is predicted almost exactly
    assert!(score.rmse < 0.5, "rmse {}", score.rmse);
}

#[test]
fn test_holdout_needs_two_seasons_to_fit() {
    let data = create_test_series(3, 12, 0.0);
    let result = evaluate_holdout(&HoltWinters::new(12).unwrap(), &data, 0.5);
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_holdout_without_test_data() {
    let data = create_test_series(3, 12, 0.0);
    let model = HoltWinters::new(12).unwrap();

    for ratio in [0.0, 1.0] {
        let result = evaluate_holdout(&model, &data, ratio);
        assert!(matches!(result, Err(ForecastError::ValidationError(_))));
    }
}
