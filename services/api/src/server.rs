use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_reassessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dose_titration::config::AppConfig;
use dose_titration::error::AppError;
use dose_titration::telemetry;
use dose_titration::workflows::reassessment::{
    ReassessmentService, ReferenceCatalog, TracingSubmissionSink,
};
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(ReferenceCatalog::standard());
    let sink = Arc::new(TracingSubmissionSink::new(config.assessment.log_payloads));
    let reassessment_service = Arc::new(ReassessmentService::new(catalog, sink));

    let app = with_reassessment_routes(reassessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        log_payloads = config.assessment.log_payloads,
        "dose titration service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
