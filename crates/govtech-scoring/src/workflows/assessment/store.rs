use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::domain::RecordId;
use super::mapping::FieldMap;
use crate::config::TableAccess;

/// Parameters for one page of a table listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub view: Option<String>,
    pub fields: Vec<String>,
    /// Cursor returned by the previous page.
    pub offset: Option<String>,
}

/// Record as returned by the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(default)]
    pub fields: FieldMap,
}

/// One page of records plus the cursor for the next page, if any.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordPage {
    pub records: Vec<StoredRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// Storage abstraction over the spreadsheet-database backing the form.
///
/// Implementations hold no per-table state; credentials arrive with each call.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_records(
        &self,
        access: &TableAccess,
        query: &ListQuery,
    ) -> Result<RecordPage, StoreError>;

    async fn create_record(
        &self,
        access: &TableAccess,
        fields: FieldMap,
    ) -> Result<RecordId, StoreError>;
}

/// Transport-level failures talking to the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store did not respond within {0:?}")]
    Timeout(Duration),
    #[error("record store unreachable: {0}")]
    Network(String),
    #[error("record store rejected the request (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("unexpected record store response: {0}")]
    Decode(String),
    #[error("invalid record store endpoint: {0}")]
    Endpoint(String),
}
