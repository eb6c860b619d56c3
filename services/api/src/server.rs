use crate::cli::ServeArgs;
use crate::infra::{airtable_service, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use govtech_scoring::config::AppConfig;
use govtech_scoring::error::AppError;
use govtech_scoring::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.airtable.services_access().is_none() {
        warn!("services table not configured; /api/services will return an empty list");
    }
    if config.airtable.submissions_access().is_none() {
        warn!("submissions table not configured; /api/submit will reject every request");
    }

    let assessment_service = airtable_service(config.airtable.clone())?;

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        airtable_timeout_ms = config.airtable.timeout.as_millis() as u64,
        "service scoring API ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
