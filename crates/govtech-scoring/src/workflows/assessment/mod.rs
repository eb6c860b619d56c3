//! Scored assessments of digital-service proposals.
//!
//! Raw payloads pass through a single validation stage, are aggregated into a
//! [`Scorecard`], mapped onto the submissions-table columns, and written once
//! through a [`RecordStore`]. The same module reads the services table for the
//! form's dropdown and models the six-step wizard that drives both calls.

pub mod airtable;
pub mod catalog;
pub mod domain;
pub mod mapping;
pub mod router;
pub mod scoring;
pub mod service;
pub mod store;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use airtable::AirtableClient;
pub use catalog::{
    fallback_catalog, other_option, selectable_options, slugify, CatalogError, ServiceOption,
};
pub use domain::{
    AssessmentSubmission, Category, FieldSpec, RecordId, Score, ScoreField, ScoreSheet,
    Scorecard, SubmissionReceipt,
};
pub use mapping::{from_external_record, to_external_record, FieldMap, StoredAssessment};
pub use router::assessment_router;
pub use scoring::{average, category_average, overall_score, AggregationError};
pub use service::{AssessmentService, PreparedSubmission, SubmissionError};
pub use store::{ListQuery, RecordPage, RecordStore, StoreError, StoredRecord};
pub use validation::{validate, Validation, OTHER_SERVICE_VALUE};
pub use wizard::{AssessmentDraft, ReviewSummary, WizardError, WizardSession, WizardStep};
