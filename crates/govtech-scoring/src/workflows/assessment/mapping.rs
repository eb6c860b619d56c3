use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::domain::{AssessmentSubmission, Category, Score, ScoreField, ScoreSheet, Scorecard};

pub const SERVICE_NAME_COLUMN: &str = "Service Name";
pub const SUBMITTER_NAME_COLUMN: &str = "Submitter Name";
pub const TIMESTAMP_COLUMN: &str = "Timestamp";
pub const OVERALL_SCORE_COLUMN: &str = "Overall Score";

pub const NOT_SPECIFIED: &str = "Not specified";
pub const ANONYMOUS: &str = "Anonymous";

/// Column name to value, in submissions-table column order.
pub type FieldMap = Map<String, Value>;

/// Submission as read back from the submissions table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAssessment {
    pub service_name: String,
    pub submitter_name: String,
    pub timestamp: String,
    pub scores: ScoreSheet,
    pub scorecard: Option<Scorecard>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("record is missing column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' holds unexpected value {value}")]
    InvalidValue { column: String, value: String },
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Build the submissions-table record, including the computed averages.
///
/// `now` stamps submissions that arrive without a client timestamp.
pub fn to_external_record(
    submission: &AssessmentSubmission,
    scorecard: &Scorecard,
    now: DateTime<Utc>,
) -> FieldMap {
    let mut fields = FieldMap::new();

    fields.insert(
        SERVICE_NAME_COLUMN.to_string(),
        Value::from(non_blank(Some(&submission.service_name)).unwrap_or(NOT_SPECIFIED)),
    );
    fields.insert(
        SUBMITTER_NAME_COLUMN.to_string(),
        Value::from(non_blank(submission.submitter_name.as_deref()).unwrap_or(ANONYMOUS)),
    );
    fields.insert(
        TIMESTAMP_COLUMN.to_string(),
        Value::from(format_timestamp(submission.timestamp.unwrap_or(now))),
    );

    for category in Category::ALL {
        for field in category.fields() {
            if let Some(score) = submission.scores.get(*field) {
                fields.insert(field.column().to_string(), Value::from(score.value()));
            }
        }
        fields.insert(
            category.average_column().to_string(),
            Value::from(scorecard.category(category)),
        );
    }

    fields.insert(
        OVERALL_SCORE_COLUMN.to_string(),
        Value::from(scorecard.overall),
    );

    fields
}

fn text_column(fields: &FieldMap, column: &str) -> Result<String, MappingError> {
    match fields.get(column) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(MappingError::InvalidValue {
            column: column.to_string(),
            value: other.to_string(),
        }),
        None => Err(MappingError::MissingColumn(column.to_string())),
    }
}

fn number_column(fields: &FieldMap, column: &str) -> Result<Option<f64>, MappingError> {
    match fields.get(column) {
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| MappingError::InvalidValue {
                column: column.to_string(),
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}

fn score_column(fields: &FieldMap, field: ScoreField) -> Result<Score, MappingError> {
    let column = field.column();
    let value = fields
        .get(column)
        .ok_or_else(|| MappingError::MissingColumn(column.to_string()))?;

    value
        .as_u64()
        .and_then(|raw| u8::try_from(raw).ok())
        .and_then(Score::new)
        .ok_or_else(|| MappingError::InvalidValue {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Reverse of [`to_external_record`].
///
/// The averages are optional so records written by formula-driven tables can
/// still be read; when any of them is absent `scorecard` is `None`.
pub fn from_external_record(fields: &FieldMap) -> Result<StoredAssessment, MappingError> {
    let service_name = text_column(fields, SERVICE_NAME_COLUMN)?;
    let submitter_name = text_column(fields, SUBMITTER_NAME_COLUMN)?;
    let timestamp = text_column(fields, TIMESTAMP_COLUMN)?;

    let scores = ScoreField::all()
        .map(|field| score_column(fields, field).map(|score| (field, score)))
        .collect::<Result<ScoreSheet, _>>()?;

    let averages = Category::ALL
        .iter()
        .map(|category| number_column(fields, category.average_column()))
        .collect::<Result<Vec<_>, _>>()?;
    let overall = number_column(fields, OVERALL_SCORE_COLUMN)?;

    let scorecard = match (averages.as_slice(), overall) {
        ([Some(value), Some(feasibility), Some(economic), Some(political)], Some(overall)) => {
            Some(Scorecard {
                value_to_citizens: *value,
                feasibility: *feasibility,
                economic_impact: *economic,
                political_alignment: *political,
                overall,
            })
        }
        _ => None,
    };

    Ok(StoredAssessment {
        service_name,
        submitter_name,
        timestamp,
        scores,
        scorecard,
    })
}
