use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::catalog::{read_catalog, CatalogError, ServiceOption};
use super::domain::{Scorecard, SubmissionReceipt};
use super::mapping::{to_external_record, FieldMap};
use super::scoring::AggregationError;
use super::store::{RecordStore, StoreError};
use super::validation::{validate, Validation};
use crate::config::{AirtableSettings, TableAccess};

/// Service composing validation, aggregation, mapping, and the record store.
///
/// Holds only immutable settings and the shared store handle, so concurrent
/// requests never coordinate.
pub struct AssessmentService<S> {
    store: Arc<S>,
    settings: AirtableSettings,
}

impl<S> AssessmentService<S>
where
    S: RecordStore + 'static,
{
    pub fn new(store: Arc<S>, settings: AirtableSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &AirtableSettings {
        &self.settings
    }

    /// List the services table.
    ///
    /// Returns an empty list without any I/O when read access is not
    /// configured.
    pub async fn list_services(&self) -> Result<Vec<ServiceOption>, CatalogError> {
        let Some(access) = self.settings.services_access() else {
            info!("Airtable services table not configured; returning empty catalog");
            return Ok(Vec::new());
        };

        let services = read_catalog(self.store.as_ref(), &access, &self.settings.services_view)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to fetch services from Airtable"))?;

        info!(count = services.len(), "fetched service catalog");
        Ok(services)
    }

    /// Write access to the submissions table or a configuration error.
    pub fn write_access(&self) -> Result<TableAccess, SubmissionError> {
        self.settings
            .submissions_access()
            .ok_or(SubmissionError::Configuration)
    }

    /// Validate, score, and map a payload without writing it.
    pub fn prepare(
        &self,
        payload: &Value,
        now: DateTime<Utc>,
    ) -> Result<PreparedSubmission, SubmissionError> {
        let submission = match validate(payload) {
            Validation::Valid(submission) => submission,
            Validation::Invalid(reasons) => return Err(SubmissionError::Validation(reasons)),
        };

        let scorecard = Scorecard::compute(&submission.scores)?;
        let fields = to_external_record(&submission, &scorecard, now);

        Ok(PreparedSubmission {
            service_name: submission.service_name,
            scorecard,
            fields,
        })
    }

    /// Create exactly one submissions record.
    ///
    /// Not idempotent: submitting the same payload twice stores two records.
    pub async fn submit(&self, payload: &Value) -> Result<SubmissionReceipt, SubmissionError> {
        let access = self.write_access().inspect_err(|_| {
            warn!("submission rejected: Airtable submissions table not configured")
        })?;

        let prepared = self.prepare(payload, Utc::now()).inspect_err(|err| {
            warn!(error = %err, "submission rejected before write");
        })?;

        let record_id = self
            .store
            .create_record(&access, prepared.fields)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to write submission to Airtable"))?;

        info!(
            record_id = %record_id,
            service = %prepared.service_name,
            overall = prepared.scorecard.overall,
            "submission stored"
        );

        Ok(SubmissionReceipt { record_id })
    }
}

/// A scored, mapped submission ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub service_name: String,
    pub scorecard: Scorecard,
    pub fields: FieldMap,
}

/// Error raised by the submission path.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Airtable not configured. Please set environment variables.")]
    Configuration,
    #[error("submission failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Transport(#[from] StoreError),
}
