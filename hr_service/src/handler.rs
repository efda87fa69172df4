//! Request handling for the forecast endpoint

use crate::cache::{ModelCache, ModelLoader};
use crate::error::{Result, ServiceError};
use crate::steps::steps_ahead;
use crate::timezone::resolve_timezone;
use chrono::{DateTime, Utc};
use hr_forecast::utils::round_half_even;
use hr_forecast::TrainedForecastModel;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error};

/// Summary returned with every failed request
pub const FAILURE_MESSAGE: &str = "Failed to generate heart rate forecast";

/// Decimal places kept in `predictedHeartRate`
const HEART_RATE_DECIMALS: u32 = 1;

/// Incoming forecast query
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForecastRequest {
    /// IANA identifier or `"UTC"`; UTC when absent
    #[serde(default)]
    pub timezone: Option<String>,
}

impl ForecastRequest {
    pub fn in_timezone(timezone: impl Into<String>) -> Self {
        Self {
            timezone: Some(timezone.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    /// Request time in the resolved zone, RFC 3339
    pub timestamp: String,
    pub predicted_heart_rate: f64,
    pub timezone: String,
    pub steps_ahead: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn from_error(err: &impl Display) -> Self {
        Self {
            error: err.to_string(),
            message: FAILURE_MESSAGE.to_string(),
        }
    }
}

/// What a request produces: a forecast, or the failure body
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastReply {
    Success(ForecastResponse),
    Failure(ErrorResponse),
}

impl ForecastReply {
    pub fn is_success(&self) -> bool {
        matches!(self, ForecastReply::Success(_))
    }

    /// HTTP status the reply is sent with
    pub fn status_code(&self) -> u16 {
        match self {
            ForecastReply::Success(_) => 200,
            ForecastReply::Failure(_) => 500,
        }
    }
}

/// Turns forecast requests into replies using the cached model
#[derive(Debug)]
pub struct ForecastHandler<L: ModelLoader> {
    cache: Arc<ModelCache<L>>,
}

impl<L: ModelLoader> ForecastHandler<L> {
    pub fn new(cache: Arc<ModelCache<L>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ModelCache<L> {
        &self.cache
    }

    /// Forecast for the current wall-clock time
    pub fn handle(&self, request: &ForecastRequest) -> ForecastReply {
        self.handle_at(request, Utc::now())
    }

    /// Forecast as if the request arrived at `now`
    ///
    /// Never fails: every error becomes [`ForecastReply::Failure`].
    pub fn handle_at(&self, request: &ForecastRequest, now: DateTime<Utc>) -> ForecastReply {
        match self.forecast_at(request, now) {
            Ok(response) => ForecastReply::Success(response),
            Err(e) => {
                error!(error = %e, "Forecast request failed");
                ForecastReply::Failure(ErrorResponse::from_error(&e))
            }
        }
    }

    fn forecast_at(
        &self,
        request: &ForecastRequest,
        now: DateTime<Utc>,
    ) -> Result<ForecastResponse> {
        let zone = resolve_timezone(request.timezone.as_deref());
        let local_now = now.with_timezone(&zone.tz());

        let model = self.cache.get_model()?;
        let model_end = model.training_end_time();

        let steps = steps_ahead(local_now.with_timezone(&Utc), model_end);
        let forecast = model.forecast(steps)?;
        let predicted = forecast
            .last_value()
            .ok_or(ServiceError::EmptyForecast(steps))?;

        let response = ForecastResponse {
            timestamp: local_now.to_rfc3339(),
            predicted_heart_rate: round_half_even(predicted, HEART_RATE_DECIMALS),
            timezone: zone.name().to_string(),
            steps_ahead: steps,
        };
        debug!(
            steps_ahead = steps,
            timezone = %response.timezone,
            predicted = response.predicted_heart_rate,
            "Forecast served"
        );
        Ok(response)
    }
}
