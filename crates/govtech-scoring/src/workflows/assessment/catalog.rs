use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mapping::FieldMap;
use super::store::{ListQuery, RecordStore, StoreError};
use super::validation::OTHER_SERVICE_VALUE;
use crate::config::TableAccess;

pub const SERVICE_NAME_FIELD: &str = "ServiceName";
pub const SERVICE_VALUE_FIELD: &str = "ServiceValue";

/// Selectable service in the form's dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub value: String,
    pub label: String,
}

impl ServiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Read-path failure. Callers fall back to the static catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read service catalog: {0}")]
    Transport(#[from] StoreError),
}

const FALLBACK_SERVICES: [(&str, &str); 14] = [
    ("passport-renewal", "Passport Renewal Portal"),
    ("business-registration", "Business Registration System"),
    ("property-tax", "Property Tax Payment Portal"),
    ("birth-death-certificates", "Birth/Death Certificate Requests"),
    ("tourism-permits", "Tourism Worker Permits"),
    ("work-permits", "Work Permit Applications"),
    ("school-enrollment", "School Enrollment Portal"),
    ("building-permits", "Building Permits System"),
    ("healthcare-appointments", "Healthcare Appointment Booking"),
    ("customs-preclearance", "Customs Pre-clearance"),
    ("digital-id", "Digital ID Platform"),
    ("tax-filing", "Online Tax Filing (Simple)"),
    ("driver-license", "Driver's License Renewal"),
    ("land-registry", "Land Registry Services"),
];

pub fn fallback_catalog() -> Vec<ServiceOption> {
    FALLBACK_SERVICES
        .iter()
        .map(|(value, label)| ServiceOption::new(*value, *label))
        .collect()
}

pub fn other_option() -> ServiceOption {
    ServiceOption::new(OTHER_SERVICE_VALUE, "Other (Please specify)")
}

/// Options offered to the user: the fetched catalog when it has entries,
/// otherwise the static fallback. "Other" is always last.
pub fn selectable_options<E>(fetched: Result<Vec<ServiceOption>, E>) -> Vec<ServiceOption> {
    let mut options = match fetched {
        Ok(services) if !services.is_empty() => services,
        _ => fallback_catalog(),
    };
    options.push(other_option());
    options
}

/// Lowercase and replace each run of whitespace with a single hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    slug
}

/// Convert a services-table row; rows without a name are skipped.
pub fn option_from_fields(fields: &FieldMap) -> Option<ServiceOption> {
    let label = fields
        .get(SERVICE_NAME_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let value = fields
        .get(SERVICE_VALUE_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| slugify(label));

    Some(ServiceOption::new(value, label))
}

/// Read every page of the services table.
///
/// A page that hands back the offset it was requested with is a decode error.
pub async fn read_catalog<S>(
    store: &S,
    access: &TableAccess,
    view: &str,
) -> Result<Vec<ServiceOption>, StoreError>
where
    S: RecordStore + ?Sized,
{
    let mut query = ListQuery {
        view: Some(view.to_string()),
        fields: vec![
            SERVICE_NAME_FIELD.to_string(),
            SERVICE_VALUE_FIELD.to_string(),
        ],
        offset: None,
    };
    let mut services = Vec::new();

    loop {
        let page = store.list_records(access, &query).await?;
        services.extend(
            page.records
                .iter()
                .filter_map(|record| option_from_fields(&record.fields)),
        );

        match page.offset {
            Some(offset) if query.offset.as_deref() == Some(offset.as_str()) => {
                return Err(StoreError::Decode(format!(
                    "services table repeated pagination offset '{offset}'"
                )));
            }
            Some(offset) if !offset.is_empty() => query.offset = Some(offset),
            _ => break,
        }
    }

    Ok(services)
}
