use crate::cli::ServeArgs;
use crate::infra::{load_engine, AppState};
use crate::routes::with_forecast_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bistro_forecast::config::AppConfig;
use bistro_forecast::error::AppError;
use bistro_forecast::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(directory) = args.artifact_dir.take() {
        config.artifacts.directory = directory;
    }

    telemetry::init(&config.telemetry)?;

    // Missing artifacts abort here, before the listener accepts anything.
    let engine = Arc::new(load_engine(&config.artifacts)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_forecast_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "restaurant forecaster ready");

    axum::serve(listener, app).await?;
    Ok(())
}
