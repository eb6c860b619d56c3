use serde_json::json;

use super::common::*;
use crate::workflows::assessment::domain::{ScoreField, ScoreSheet};
use crate::workflows::assessment::validation::{validate, Validation};

fn reasons(validation: Validation) -> Vec<String> {
    match validation {
        Validation::Invalid(reasons) => reasons,
        Validation::Valid(submission) => panic!("expected rejection, got {submission:?}"),
    }
}

#[test]
fn complete_payload_is_accepted() {
    let submission = validate(&uniform_payload(4))
        .into_result()
        .expect("payload is valid");

    assert_eq!(submission.service_name, "Passport Renewal Portal");
    assert_eq!(submission.submitter_name.as_deref(), Some("Ada Clarke"));
    assert_eq!(
        submission.timestamp.map(|ts| ts.to_rfc3339()),
        Some("2025-10-01T14:30:00+00:00".to_string())
    );
    assert_eq!(submission.scores, ScoreSheet::uniform(score(4)));
}

#[test]
fn optional_identity_fields_may_be_absent() {
    let payload = without(without(uniform_payload(2), "submitterName"), "timestamp");
    let submission = validate(&payload).into_result().expect("payload is valid");

    assert_eq!(submission.submitter_name, None);
    assert_eq!(submission.timestamp, None);

    let blank = with(uniform_payload(2), "submitterName", json!("   "));
    let submission = validate(&blank).into_result().expect("payload is valid");
    assert_eq!(submission.submitter_name, None);
}

#[test]
fn other_service_records_free_text_name() {
    let payload = with(
        with(uniform_payload(3), "serviceName", json!("other")),
        "otherServiceName",
        json!("  Fisheries Licensing  "),
    );

    let submission = validate(&payload).into_result().expect("payload is valid");
    assert_eq!(submission.service_name, "Fisheries Licensing");
}

#[test]
fn other_service_without_free_text_is_rejected() {
    let payload = with(uniform_payload(3), "serviceName", json!("other"));
    assert_eq!(
        reasons(validate(&payload)),
        vec!["otherServiceName is required when serviceName is 'other'".to_string()]
    );
}

#[test]
fn every_problem_is_reported_at_once() {
    let payload = without(
        without(
            with(uniform_payload(3), "painLevel", json!(0)),
            "serviceName",
        ),
        "eodbImpact",
    );

    let reasons = reasons(validate(&payload));
    assert_eq!(
        reasons,
        vec![
            "serviceName is required".to_string(),
            "painLevel must be between 1 and 5, found 0".to_string(),
            "eodbImpact is required".to_string(),
        ]
    );
}

#[test]
fn scores_outside_scale_are_rejected() {
    for value in [json!(0), json!(6), json!(-1), json!(300)] {
        let payload = with(uniform_payload(3), "mandatory", value.clone());
        let reasons = reasons(validate(&payload));
        assert_eq!(reasons.len(), 1, "value {value}");
        assert!(reasons[0].starts_with("mandatory must be between 1 and 5"));
    }
}

#[test]
fn fractional_and_non_numeric_scores_are_rejected() {
    let fractional = with(uniform_payload(3), "costSavings", json!(3.5));
    assert!(reasons(validate(&fractional))[0].starts_with("costSavings must be a whole number"));

    let float_whole = with(uniform_payload(3), "costSavings", json!(3.0));
    assert!(reasons(validate(&float_whole))[0].starts_with("costSavings must be a whole number"));

    let text = with(uniform_payload(3), "costSavings", json!("4"));
    assert_eq!(
        reasons(validate(&text)),
        vec!["costSavings must be a number".to_string()]
    );
}

#[test]
fn malformed_identity_fields_are_rejected() {
    let payload = with(
        with(uniform_payload(3), "serviceName", json!(12)),
        "timestamp",
        json!("yesterday"),
    );

    let reasons = reasons(validate(&payload));
    assert_eq!(reasons.len(), 2);
    assert_eq!(reasons[0], "serviceName must be a string");
    assert_eq!(
        reasons[1],
        "timestamp must be an ISO-8601 date or date-time, found 'yesterday'"
    );
}

#[test]
fn non_object_payload_is_rejected() {
    for payload in [json!([1, 2, 3]), json!("scores"), json!(null)] {
        assert_eq!(
            reasons(validate(&payload)),
            vec!["submission must be a JSON object".to_string()]
        );
    }
}

#[test]
fn unknown_keys_are_ignored() {
    let payload = with(uniform_payload(5), "favouriteColour", json!("teal"));
    let submission = validate(&payload).into_result().expect("payload is valid");
    assert_eq!(submission.scores.get(ScoreField::TimingSensitivity), Some(score(5)));
}

#[test]
fn timestamps_without_offset_are_read_as_utc() {
    let cases = [
        ("2025-10-01T14:30:00Z", "2025-10-01T14:30:00+00:00"),
        ("2025-10-01T16:30:00+02:00", "2025-10-01T14:30:00+00:00"),
        ("2025-10-01T14:30:00", "2025-10-01T14:30:00+00:00"),
        ("2025-10-01T14:30:00.250", "2025-10-01T14:30:00.250+00:00"),
        ("2025-10-01", "2025-10-01T00:00:00+00:00"),
    ];

    for (raw, expected) in cases {
        let payload = with(uniform_payload(3), "timestamp", json!(raw));
        let submission = validate(&payload)
            .into_result()
            .unwrap_or_else(|reasons| panic!("{raw} rejected: {reasons:?}"));
        assert_eq!(
            submission.timestamp.map(|ts| ts.to_rfc3339()),
            Some(expected.to_string()),
            "timestamp {raw}"
        );
    }
}

#[test]
fn unparseable_timestamps_are_rejected() {
    for raw in ["2025-13-01", "2025-10-01T25:00:00", "01/10/2025", "2025-10-01 14:30"] {
        let payload = with(uniform_payload(3), "timestamp", json!(raw));
        assert_eq!(
            reasons(validate(&payload)),
            vec![format!(
                "timestamp must be an ISO-8601 date or date-time, found '{raw}'"
            )]
        );
    }
}

#[test]
fn integers_beyond_i64_report_the_scale() {
    let payload = with(uniform_payload(3), "frequency", json!(u64::MAX));
    assert_eq!(
        reasons(validate(&payload)),
        vec![format!("frequency must be between 1 and 5, found {}", u64::MAX)]
    );
}
