use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::ForecastRequest;
use super::engine::{ForecastEngine, ForecastError};

/// Router exposing the forecast and the vocabularies that feed the form.
///
/// `/predict/unified` is the path the dashboard frontend posts to.
pub fn forecast_router(engine: Arc<ForecastEngine>) -> Router {
    Router::new()
        .route("/api/v1/forecast", post(forecast_handler))
        .route("/predict/unified", post(forecast_handler))
        .route("/api/v1/vocabulary", get(vocabulary_handler))
        .with_state(engine)
}

pub(crate) async fn forecast_handler(
    State(engine): State<Arc<ForecastEngine>>,
    payload: Result<axum::Json<ForecastRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(axum::Json(request)) => request,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.body_text(),
            });
            return (rejection.status(), axum::Json(payload)).into_response();
        }
    };

    match engine.forecast(&request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => {
            let status = match &error {
                ForecastError::InvalidInput(_) | ForecastError::UnknownLabel { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ForecastError::Prediction { .. } => {
                    tracing::error!(error = %error, "forecast failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let payload = json!({
                "error": error.to_string(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn vocabulary_handler(State(engine): State<Arc<ForecastEngine>>) -> Response {
    let payload = json!({
        "cities": engine.cities(),
        "cuisines": engine.cuisines(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
