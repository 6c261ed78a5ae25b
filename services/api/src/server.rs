use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::dashboard_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use enrollment::config::AppConfig;
use enrollment::dashboard::DatasetCache;
use enrollment::error::AppError;
use enrollment::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data) = args.data.take() {
        config.dashboard.data_path = data;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        cache: Arc::new(DatasetCache::new()),
        dashboard: config.dashboard.clone(),
    };

    // A bad source is reported on every request rather than at startup.
    match app_state.dataset() {
        Ok(dataset) => info!(rows = dataset.len(), "enrollment dataset preloaded"),
        Err(err) => warn!(%err, path = %config.dashboard.data_path.display(), "enrollment dataset unavailable"),
    }

    let app = dashboard_router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enrollment dashboard ready");

    axum::serve(listener, app).await?;
    Ok(())
}
