use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use trustlens::assessment::{AssessmentConfig, AssessmentEngine};
use trustlens::catalog::Catalog;
use trustlens::config::AppConfig;
use trustlens::error::AppError;
use trustlens::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = Catalog::from_dir(&config.catalog.data_dir)?;
    let engine = AssessmentEngine::new(AssessmentConfig {
        authority_weight: config.catalog.authority_weight,
        ..AssessmentConfig::default()
    });

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog: Arc::new(catalog),
        engine: Arc::new(engine),
    };

    let app = routes::router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "trust assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
