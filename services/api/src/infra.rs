use bistro_forecast::config::ArtifactConfig;
use bistro_forecast::error::AppError;
use bistro_forecast::forecast::{ForecastEngine, ModelRegistry};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads all seven artifacts; any missing one stops startup.
pub(crate) fn load_engine(config: &ArtifactConfig) -> Result<ForecastEngine, AppError> {
    info!(
        directory = %config.directory.display(),
        policy = ?config.unknown_label_policy,
        "loading model artifacts"
    );
    let registry = ModelRegistry::from_dir(&config.directory)?;
    Ok(ForecastEngine::new(registry, config.unknown_label_policy))
}
