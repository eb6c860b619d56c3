use govtech_scoring::config::AirtableSettings;
use govtech_scoring::error::AppError;
use govtech_scoring::workflows::assessment::{AirtableClient, AssessmentService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LiveAssessmentService = AssessmentService<AirtableClient>;

/// Assessment service backed by the Airtable REST API.
pub(crate) fn airtable_service(
    settings: AirtableSettings,
) -> Result<Arc<LiveAssessmentService>, AppError> {
    let client = AirtableClient::from_settings(&settings)?;
    Ok(Arc::new(AssessmentService::new(Arc::new(client), settings)))
}
