use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::cache::ModelLoader;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::handler::{ErrorResponse, ForecastHandler, ForecastReply, ForecastRequest};

/// Path of the forecast endpoint
pub const FORECAST_ROUTE: &str = "/api/GetForecast";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
}

impl IntoResponse for ForecastReply {
    fn into_response(self) -> Response {
        match self {
            ForecastReply::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            ForecastReply::Failure(body) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

// Handlers
async fn health<L: ModelLoader + 'static>(
    State(handler): State<Arc<ForecastHandler<L>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: handler.cache().is_loaded(),
    })
}

async fn get_forecast<L: ModelLoader + 'static>(
    State(handler): State<Arc<ForecastHandler<L>>>,
    query: std::result::Result<Query<ForecastRequest>, QueryRejection>,
) -> ForecastReply {
    let request = match query {
        Ok(Query(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected forecast query");
            return ForecastReply::Failure(ErrorResponse::from_error(&rejection));
        }
    };

    // The first request may read the artifact from disk
    match tokio::task::spawn_blocking(move || handler.handle(&request)).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(error = %e, "Forecast task failed");
            ForecastReply::Failure(ErrorResponse::from_error(&e))
        }
    }
}

/// Routes served by the forecast host
pub fn router<L: ModelLoader + 'static>(handler: Arc<ForecastHandler<L>>) -> Router {
    Router::new()
        .route("/health", get(health::<L>))
        .route(FORECAST_ROUTE, get(get_forecast::<L>))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(handler)
}

pub async fn run_api_server<L: ModelLoader + 'static>(
    config: &ApiConfig,
    handler: Arc<ForecastHandler<L>>,
) -> Result<()> {
    let app = router(handler);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, route = FORECAST_ROUTE, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ModelCache;
    use crate::handler::{ForecastResponse, FAILURE_MESSAGE};
    use axum::body::to_bytes;
    use chrono::{DateTime, Duration, Utc};
    use hr_forecast::{ForecastError, ForecastResult, TrainedForecastModel};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug)]
    struct RecentModel {
        end: DateTime<Utc>,
    }

    impl TrainedForecastModel for RecentModel {
        fn forecast(&self, horizons: usize) -> hr_forecast::error::Result<ForecastResult> {
            ForecastResult::new(vec![64.04; horizons], horizons)
        }

        fn training_end_time(&self) -> DateTime<Utc> {
            self.end
        }

        fn name(&self) -> &str {
            "recent"
        }
    }

    #[derive(Default)]
    struct ToggleLoader {
        broken: AtomicBool,
    }

    impl ModelLoader for ToggleLoader {
        type Model = RecentModel;

        fn load(&self) -> hr_forecast::error::Result<RecentModel> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(ForecastError::artifact("hw_model.json", "No such file"));
            }
            Ok(RecentModel {
                end: Utc::now() - Duration::minutes(30),
            })
        }

        fn describe(&self) -> String {
            "toggle".to_string()
        }
    }

    fn handler(broken: bool) -> Arc<ForecastHandler<ToggleLoader>> {
        let loader = ToggleLoader::default();
        loader.broken.store(broken, Ordering::SeqCst);
        Arc::new(ForecastHandler::new(Arc::new(ModelCache::new(loader))))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_forecast_success_is_200() {
        let reply = get_forecast(
            State(handler(false)),
            Ok(Query(ForecastRequest::in_timezone("Europe/Berlin"))),
        )
        .await;
        let response = reply.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body: ForecastResponse = body_json(response).await;
        assert_eq!(body.timezone, "Europe/Berlin");
        assert_eq!(body.predicted_heart_rate, 64.0);
        assert!(body.steps_ahead >= 6);
    }

    #[tokio::test]
    async fn test_forecast_failure_is_500() {
        let reply = get_forecast(State(handler(true)), Ok(Query(ForecastRequest::default()))).await;
        let response = reply.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.message, FAILURE_MESSAGE);
        assert!(body.error.contains("No such file"));
    }

    #[tokio::test]
    async fn test_health_reports_cache_state() {
        let handler = handler(false);

        let Json(before) = health(State(Arc::clone(&handler))).await;
        assert_eq!(before.status, "ok");
        assert!(!before.model_loaded);

        let _ = get_forecast(
            State(Arc::clone(&handler)),
            Ok(Query(ForecastRequest::default())),
        )
        .await;

        let Json(after) = health(State(handler)).await;
        assert!(after.model_loaded);
    }

    #[test]
    fn test_router_builds() {
        let _app = router(handler(false));
    }
}
