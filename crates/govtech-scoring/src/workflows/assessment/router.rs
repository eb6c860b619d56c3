use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::service::{AssessmentService, SubmissionError};
use super::store::RecordStore;

pub const SERVICES_PATH: &str = "/api/services";
pub const SUBMIT_PATH: &str = "/api/submit";

/// Router exposing the catalog and submission endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            SERVICES_PATH,
            get(services_handler::<S>).fallback(method_not_allowed),
        )
        .route(
            SUBMIT_PATH,
            post(submit_handler::<S>).fallback(method_not_allowed),
        )
        .with_state(service)
}

pub(crate) async fn method_not_allowed() -> Response {
    let payload = json!({ "error": "Method not allowed" });
    (StatusCode::METHOD_NOT_ALLOWED, Json(payload)).into_response()
}

pub(crate) async fn services_handler<S>(State(service): State<Arc<AssessmentService<S>>>) -> Response
where
    S: RecordStore + 'static,
{
    match service.list_services().await {
        Ok(services) => (StatusCode::OK, Json(json!({ "services": services }))).into_response(),
        Err(error) => {
            let payload = json!({
                "error": "Failed to fetch services",
                "details": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: RecordStore + 'static,
{
    let result = match payload {
        Ok(Json(payload)) => service.submit(&payload).await,
        Err(rejection) => service
            .write_access()
            .and(Err(SubmissionError::Validation(vec![rejection.body_text()]))),
    };

    match result {
        Ok(receipt) => {
            let payload = json!({
                "success": true,
                "recordId": receipt.record_id,
                "message": "Submission saved successfully",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(SubmissionError::Configuration) => {
            let payload = json!({ "error": SubmissionError::Configuration.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(SubmissionError::Validation(reasons)) => {
            let payload = json!({
                "error": "Invalid submission",
                "details": reasons,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": "Failed to submit to Airtable",
                "details": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
