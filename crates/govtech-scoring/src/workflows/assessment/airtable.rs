use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::domain::RecordId;
use super::mapping::FieldMap;
use super::store::{ListQuery, RecordPage, RecordStore, StoreError};
use crate::config::{AirtableSettings, TableAccess};

/// Airtable REST gateway.
///
/// Shares one connection pool across requests but keeps no credentials of its
/// own: every call is authorised with the `TableAccess` it is given. Each
/// request is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct AirtableClient {
    http: Client,
    api_url: Url,
    timeout: Duration,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    records: [NewRecord<'a>; 1],
}

#[derive(Serialize)]
struct NewRecord<'a> {
    fields: &'a FieldMap,
}

#[derive(Deserialize)]
struct CreateResponse {
    records: Vec<CreatedRecord>,
}

#[derive(Deserialize)]
struct CreatedRecord {
    id: RecordId,
}

impl AirtableClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let api_url = Url::parse(api_url)
            .map_err(|err| StoreError::Endpoint(format!("'{api_url}': {err}")))?;
        if api_url.cannot_be_a_base() {
            return Err(StoreError::Endpoint(format!(
                "'{api_url}' cannot carry a base/table path"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_url,
            timeout,
        })
    }

    pub fn from_settings(settings: &AirtableSettings) -> Result<Self, StoreError> {
        Self::new(&settings.api_url, settings.timeout)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn table_url(&self, access: &TableAccess) -> Result<Url, StoreError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Endpoint(self.api_url.to_string()))?
            .pop_if_empty()
            .push(&access.base_id)
            .push(&access.table);
        Ok(url)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Network(err.to_string())
        }
    }

    async fn check_status(&self, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(err))?;
        Err(StoreError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}

/// Pull the human readable message out of an Airtable error body.
///
/// Airtable answers either `{"error": {"type": .., "message": ..}}` or
/// `{"error": "NOT_FOUND"}`.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(|value| value.get("error"));

    match detail {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Object(error)) => {
            let kind = error.get("type").and_then(Value::as_str);
            let message = error.get("message").and_then(Value::as_str);
            match (kind, message) {
                (Some(kind), Some(message)) => format!("{kind}: {message}"),
                (None, Some(message)) => message.to_string(),
                (Some(kind), None) => kind.to_string(),
                (None, None) => body.to_string(),
            }
        }
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list_records(
        &self,
        access: &TableAccess,
        query: &ListQuery,
    ) -> Result<RecordPage, StoreError> {
        let url = self.table_url(access)?;

        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(view) = query.view.as_deref() {
            params.push(("view", view));
        }
        for field in &query.fields {
            params.push(("fields[]", field.as_str()));
        }
        if let Some(offset) = query.offset.as_deref() {
            params.push(("offset", offset));
        }

        debug!(table = %access.table, offset = ?query.offset, "listing Airtable records");

        let response = self
            .http
            .get(url)
            .bearer_auth(&access.token)
            .query(&params)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        self.check_status(response)
            .await?
            .json::<RecordPage>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn create_record(
        &self,
        access: &TableAccess,
        fields: FieldMap,
    ) -> Result<RecordId, StoreError> {
        let url = self.table_url(access)?;
        let body = CreateRequest {
            records: [NewRecord { fields: &fields }],
        };

        debug!(table = %access.table, columns = fields.len(), "creating Airtable record");

        let response = self
            .http
            .post(url)
            .bearer_auth(&access.token)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let created = self
            .check_status(response)
            .await?
            .json::<CreateResponse>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;

        created
            .records
            .into_iter()
            .next()
            .map(|record| record.id)
            .ok_or_else(|| StoreError::Decode("create response contained no records".to_string()))
    }
}
