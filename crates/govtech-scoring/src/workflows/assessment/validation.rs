use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::domain::{AssessmentSubmission, Score, ScoreField, ScoreSheet};

/// Catalog value signalling that the service name is given as free text.
pub const OTHER_SERVICE_VALUE: &str = "other";

/// Outcome of checking a raw submit payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(AssessmentSubmission),
    Invalid(Vec<String>),
}

impl Validation {
    pub fn into_result(self) -> Result<AssessmentSubmission, Vec<String>> {
        match self {
            Validation::Valid(submission) => Ok(submission),
            Validation::Invalid(reasons) => Err(reasons),
        }
    }
}

/// Check the payload shape once, collecting every problem found.
pub fn validate(payload: &Value) -> Validation {
    let Some(object) = payload.as_object() else {
        return Validation::Invalid(vec!["submission must be a JSON object".to_string()]);
    };

    let mut reasons = Vec::new();

    let service_name = service_name(object, &mut reasons);
    let submitter_name = optional_text(object, "submitterName", &mut reasons);
    let timestamp = optional_text(object, "timestamp", &mut reasons).and_then(|raw| {
        let parsed = parse_timestamp(&raw);
        if parsed.is_none() {
            reasons.push(format!(
                "timestamp must be an ISO-8601 date or date-time, found '{raw}'"
            ));
        }
        parsed
    });

    let mut scores = ScoreSheet::default();
    for field in ScoreField::all() {
        match score(object.get(field.key())) {
            Ok(value) => scores.set(field, value),
            Err(problem) => reasons.push(format!("{} {problem}", field.key())),
        }
    }

    match service_name {
        Some(service_name) if reasons.is_empty() => Validation::Valid(AssessmentSubmission {
            service_name,
            submitter_name,
            timestamp,
            scores,
        }),
        _ => Validation::Invalid(reasons),
    }
}

fn service_name(object: &Map<String, Value>, reasons: &mut Vec<String>) -> Option<String> {
    let selected = match object.get("serviceName") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            reasons.push("serviceName is required".to_string());
            return None;
        }
        Some(_) => {
            reasons.push("serviceName must be a string".to_string());
            return None;
        }
    };

    if selected != OTHER_SERVICE_VALUE {
        return Some(selected);
    }

    let other = optional_text(object, "otherServiceName", reasons);
    if other.is_none() {
        reasons.push(format!(
            "otherServiceName is required when serviceName is '{OTHER_SERVICE_VALUE}'"
        ));
    }
    other
}

fn optional_text(
    object: &Map<String, Value>,
    key: &str,
    reasons: &mut Vec<String>,
) -> Option<String> {
    match object.get(key) {
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Null) | None => None,
        Some(_) => {
            reasons.push(format!("{key} must be a string"));
            None
        }
    }
}

/// Accepts RFC 3339, an ISO-8601 date-time without offset, or a bare date.
/// Values without an offset are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn score(value: Option<&Value>) -> Result<Score, String> {
    let number = match value {
        Some(Value::Number(number)) => number,
        Some(Value::Null) | None => return Err("is required".to_string()),
        Some(_) => return Err("must be a number".to_string()),
    };

    let out_of_range = || {
        format!(
            "must be between {} and {}, found {number}",
            Score::MIN,
            Score::MAX
        )
    };

    let Some(raw) = number.as_i64() else {
        if number.is_u64() {
            return Err(out_of_range());
        }
        return Err(format!("must be a whole number, found {number}"));
    };

    u8::try_from(raw).ok().and_then(Score::new).ok_or_else(out_of_range)
}
