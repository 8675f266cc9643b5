use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use bistro_forecast::forecast::{forecast_router, ForecastEngine};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_forecast_routes(engine: Arc<ForecastEngine>) -> axum::Router {
    forecast_router(engine)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use bistro_forecast::forecast::{ModelRegistry, UnknownLabelPolicy};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/bistro-forecast/tests/fixtures/artifacts");
        let registry = ModelRegistry::from_dir(dir).expect("fixture artifacts load");
        let engine = Arc::new(ForecastEngine::new(registry, UnknownLabelPolicy::Fallback));

        let readiness = Arc::new(AtomicBool::new(false));
        readiness.store(ready, Ordering::Release);
        let state = AppState {
            readiness,
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_forecast_routes(engine).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, body) = get(app(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn forecast_accepts_capitalised_frontend_keys() {
        let payload = json!({
            "Resturant_Name": "Tandoor Junction",
            "City": "Delhi",
            "Cuisine": "North Indian",
            "Ratings": 4.0,
            "year": 2024,
            "month": 7,
            "sales_qty": 20,
            "sales_amount": 1500
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/forecast")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request");

        let response = app(true).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let report: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(report["best_city"], "Delhi");
        assert_eq!(report["sales_display"], "₹38,500");
        assert_eq!(report["city_table"].as_array().map(Vec::len), Some(5));
    }
}
