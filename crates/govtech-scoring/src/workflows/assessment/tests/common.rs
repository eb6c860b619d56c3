use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Map, Value};

use crate::config::{AirtableSettings, TableAccess};
use crate::workflows::assessment::domain::{RecordId, Score, ScoreField};
use crate::workflows::assessment::mapping::FieldMap;
use crate::workflows::assessment::store::{
    ListQuery, RecordPage, RecordStore, StoreError, StoredRecord,
};
use crate::workflows::assessment::{assessment_router, AssessmentService};

pub(super) fn configured_settings() -> AirtableSettings {
    AirtableSettings {
        api_key: Some("key-read".to_string()),
        personal_access_token: Some("pat-write".to_string()),
        base_id: Some("appGovTech".to_string()),
        services_table: Some("Services".to_string()),
        submissions_table: Some("Submissions".to_string()),
        ..AirtableSettings::default()
    }
}

pub(super) fn unconfigured_settings() -> AirtableSettings {
    AirtableSettings::default()
}

/// Payload as the wizard sends it, every score set to `value`.
pub(super) fn uniform_payload(value: u8) -> Value {
    let mut payload = Map::new();
    payload.insert("serviceName".to_string(), json!("Passport Renewal Portal"));
    payload.insert("submitterName".to_string(), json!("Ada Clarke"));
    payload.insert("timestamp".to_string(), json!("2025-10-01T14:30:00.000Z"));
    for field in ScoreField::all() {
        payload.insert(field.key().to_string(), json!(value));
    }
    Value::Object(payload)
}

/// Payload with distinct per-category scores:
/// value to citizens 2.00, feasibility 4.00, economic 3.00, political 5.00.
pub(super) fn tiered_payload() -> Value {
    let mut payload = uniform_payload(3);
    let object = payload.as_object_mut().expect("payload is an object");
    for field in ScoreField::all() {
        let value = match field.category() {
            crate::workflows::assessment::Category::ValueToCitizens => 2,
            crate::workflows::assessment::Category::Feasibility => 4,
            crate::workflows::assessment::Category::EconomicImpact => 3,
            crate::workflows::assessment::Category::PoliticalAlignment => 5,
        };
        object.insert(field.key().to_string(), json!(value));
    }
    payload
}

pub(super) fn without(mut payload: Value, key: &str) -> Value {
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove(key);
    payload
}

pub(super) fn with(mut payload: Value, key: &str, value: Value) -> Value {
    payload
        .as_object_mut()
        .expect("payload is an object")
        .insert(key.to_string(), value);
    payload
}

pub(super) fn score(value: u8) -> Score {
    Score::new(value).expect("score within scale")
}

pub(super) fn service_row(id: &str, name: Option<&str>, value: Option<&str>) -> StoredRecord {
    let mut fields = FieldMap::new();
    if let Some(name) = name {
        fields.insert("ServiceName".to_string(), json!(name));
    }
    if let Some(value) = value {
        fields.insert("ServiceValue".to_string(), json!(value));
    }
    StoredRecord {
        id: RecordId(id.to_string()),
        fields,
    }
}

/// In-memory store counting every call it receives.
#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) pages: Vec<RecordPage>,
    pub(super) created: Mutex<Vec<(TableAccess, FieldMap)>>,
    pub(super) queries: Mutex<Vec<ListQuery>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl MemoryStore {
    pub(super) fn with_pages(pages: Vec<RecordPage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub(super) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(super) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(super) fn created(&self) -> Vec<(TableAccess, FieldMap)> {
        self.created.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn queries(&self) -> Vec<ListQuery> {
        self.queries.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_records(
        &self,
        _access: &TableAccess,
        query: &ListQuery,
    ) -> Result<RecordPage, StoreError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("store mutex poisoned")
            .push(query.clone());
        Ok(self.pages.get(call).cloned().unwrap_or_default())
    }

    async fn create_record(
        &self,
        access: &TableAccess,
        fields: FieldMap,
    ) -> Result<RecordId, StoreError> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.created
            .lock()
            .expect("store mutex poisoned")
            .push((access.clone(), fields));
        Ok(RecordId(format!("rec{call:06}")))
    }
}

/// Store whose every call fails with the given HTTP status.
pub(super) struct UnavailableStore {
    pub(super) status: u16,
}

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn list_records(
        &self,
        _access: &TableAccess,
        _query: &ListQuery,
    ) -> Result<RecordPage, StoreError> {
        Err(StoreError::Api {
            status: self.status,
            message: "SERVICE_UNAVAILABLE".to_string(),
        })
    }

    async fn create_record(
        &self,
        _access: &TableAccess,
        _fields: FieldMap,
    ) -> Result<RecordId, StoreError> {
        Err(StoreError::Api {
            status: self.status,
            message: "SERVICE_UNAVAILABLE".to_string(),
        })
    }
}

pub(super) fn build_service(
    store: MemoryStore,
    settings: AirtableSettings,
) -> (Arc<AssessmentService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let service = Arc::new(AssessmentService::new(store.clone(), settings));
    (service, store)
}

pub(super) fn router_for(service: Arc<AssessmentService<MemoryStore>>) -> axum::Router {
    assessment_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
