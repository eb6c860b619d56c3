use chrono::{TimeZone, Utc};
use serde_json::json;

use super::common::*;
use crate::workflows::assessment::catalog::{other_option, selectable_options, CatalogError};
use crate::workflows::assessment::domain::{Score, ScoreField};
use crate::workflows::assessment::validation::validate;
use crate::workflows::assessment::wizard::{
    AssessmentDraft, WizardError, WizardSession, WizardStep,
};

fn session() -> WizardSession {
    WizardSession::new(selectable_options::<CatalogError>(Ok(Vec::new())))
}

fn advance_to_review(session: &mut WizardSession) {
    while session.step() != WizardStep::Review {
        session.advance().expect("step advances");
    }
}

#[test]
fn steps_run_in_order() {
    let mut step = WizardStep::ServiceSelection;
    let mut visited = vec![step];
    while let Some(next) = step.next() {
        assert_eq!(next.previous(), Some(step));
        visited.push(next);
        step = next;
    }

    assert_eq!(visited, WizardStep::ALL);
    assert_eq!(WizardStep::Review.position(), 6);
    assert_eq!(WizardStep::Feasibility.title(), "Feasibility");
    assert_eq!(WizardStep::ServiceSelection.category(), None);
}

#[test]
fn new_session_starts_with_neutral_scores() {
    let session = session();
    assert_eq!(session.step(), WizardStep::ServiceSelection);
    assert!(session
        .draft()
        .scores
        .iter()
        .all(|(_, score)| score == Score::NEUTRAL));
    assert_eq!(session.draft().scores.iter().count(), 27);
    assert_eq!(session.options().last(), Some(&other_option()));
}

#[test]
fn cannot_leave_service_selection_without_a_choice() {
    let mut session = session();
    assert!(!session.can_advance());
    assert_eq!(session.advance(), Err(WizardError::ServiceNotSelected));

    session.select_service("other").expect("other is offered");
    assert_eq!(session.advance(), Err(WizardError::ServiceNotSelected));

    session.set_other_service_name("   ");
    assert!(!session.can_advance());

    session.set_other_service_name("Fisheries Licensing");
    assert!(session.can_advance());
    assert_eq!(session.advance(), Ok(WizardStep::ValueToCitizens));
}

#[test]
fn unknown_services_cannot_be_selected() {
    let mut session = session();
    assert_eq!(
        session.select_service("moon-base"),
        Err(WizardError::UnknownService("moon-base".to_string()))
    );
    assert_eq!(session.draft().service_value, "");
}

#[test]
fn back_and_forward_keep_answers() {
    let mut session = session();
    session.select_service("digital-id").expect("catalog service");
    session.advance().expect("leave selection");
    session
        .set_score(ScoreField::PainLevel, 5)
        .expect("score in range");
    session.advance().expect("to feasibility");

    assert_eq!(session.back(), Ok(WizardStep::ValueToCitizens));
    assert_eq!(session.back(), Ok(WizardStep::ServiceSelection));
    assert_eq!(session.back(), Err(WizardError::AtFirstStep));
    assert_eq!(session.draft().scores.get(ScoreField::PainLevel), Some(score(5)));
}

#[test]
fn scores_outside_scale_are_refused() {
    let mut session = session();
    assert_eq!(
        session.set_score(ScoreField::CostSavings, 0),
        Err(WizardError::ScoreOutOfRange {
            field: ScoreField::CostSavings,
            value: 0
        })
    );
    assert_eq!(
        session.draft().scores.get(ScoreField::CostSavings),
        Some(Score::NEUTRAL)
    );
}

#[test]
fn review_shows_live_scorecard_and_defaults() {
    let mut session = session();
    assert_eq!(session.review().expect("review").service_name, "Not selected");

    session.select_service("tax-filing").expect("catalog service");
    for field in ScoreField::all().filter(|field| field.category().fields().len() == 6) {
        session.set_score(field, 5).expect("score in range");
    }

    let summary = session.review().expect("review");
    assert_eq!(summary.service_name, "Online Tax Filing (Simple)");
    assert_eq!(summary.submitter_name, "Anonymous");
    assert_eq!(summary.scorecard.value_to_citizens, 5.0);
    assert_eq!(summary.scorecard.feasibility, 3.0);
    assert_eq!(summary.scorecard.overall, 3.5);
}

#[test]
fn payload_is_only_available_on_review() {
    let mut session = session();
    session.select_service("digital-id").expect("catalog service");
    let now = Utc::now();

    assert_eq!(
        session.submission_payload(now),
        Err(WizardError::NotReviewing)
    );

    advance_to_review(&mut session);
    assert!(!session.can_advance());
    assert_eq!(session.advance(), Err(WizardError::AtLastStep));
    assert!(session.submission_payload(now).is_ok());
}

#[test]
fn review_payload_passes_submission_validation() {
    let mut session = session();
    session.select_service("other").expect("other is offered");
    session.set_other_service_name("Fisheries Licensing");
    session.set_submitter_name("Ada Clarke");
    advance_to_review(&mut session);
    session
        .set_score(ScoreField::TimingSensitivity, 1)
        .expect("score in range");

    let now = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
    let payload = session.submission_payload(now).expect("payload");
    assert_eq!(payload["serviceName"], json!("Fisheries Licensing"));
    assert_eq!(payload["timestamp"], json!("2025-10-01T08:00:00.000Z"));
    assert_eq!(payload["timingSensitivity"], json!(1));

    let submission = validate(&payload).into_result().expect("payload is valid");
    assert_eq!(submission.service_name, "Fisheries Licensing");
    assert_eq!(submission.scores, session.draft().scores);
}

#[test]
fn reset_returns_to_start_and_keeps_options() {
    let mut session = session();
    session.select_service("land-registry").expect("catalog service");
    session.set_submitter_name("Ada Clarke");
    advance_to_review(&mut session);

    let options = session.options().to_vec();
    session.reset();

    assert_eq!(session.step(), WizardStep::ServiceSelection);
    assert_eq!(session.draft(), &AssessmentDraft::default());
    assert_eq!(session.options(), options.as_slice());
}
