//! Six-step assessment wizard.
//!
//! The wizard is a finite state machine over [`WizardStep`] plus the form
//! draft it accumulates. A UI renders the current step and forwards user input;
//! the only guarded transition is leaving service selection, which requires a
//! catalog choice or a free-text name for "other".

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::catalog::ServiceOption;
use super::domain::{Category, Score, ScoreField, ScoreSheet, Scorecard};
use super::mapping::{format_timestamp, ANONYMOUS};
use super::scoring::AggregationError;
use super::validation::OTHER_SERVICE_VALUE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ServiceSelection,
    ValueToCitizens,
    Feasibility,
    EconomicImpact,
    PoliticalAlignment,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::ServiceSelection,
        WizardStep::ValueToCitizens,
        WizardStep::Feasibility,
        WizardStep::EconomicImpact,
        WizardStep::PoliticalAlignment,
        WizardStep::Review,
    ];

    /// Following step; `None` once the review step is reached.
    pub fn next(self) -> Option<Self> {
        match self {
            WizardStep::ServiceSelection => Some(WizardStep::ValueToCitizens),
            WizardStep::ValueToCitizens => Some(WizardStep::Feasibility),
            WizardStep::Feasibility => Some(WizardStep::EconomicImpact),
            WizardStep::EconomicImpact => Some(WizardStep::PoliticalAlignment),
            WizardStep::PoliticalAlignment => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            WizardStep::ServiceSelection => None,
            WizardStep::ValueToCitizens => Some(WizardStep::ServiceSelection),
            WizardStep::Feasibility => Some(WizardStep::ValueToCitizens),
            WizardStep::EconomicImpact => Some(WizardStep::Feasibility),
            WizardStep::PoliticalAlignment => Some(WizardStep::EconomicImpact),
            WizardStep::Review => Some(WizardStep::PoliticalAlignment),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::ServiceSelection => "Service Selection",
            WizardStep::Review => "Review",
            other => other.category().map(Category::label).unwrap_or_default(),
        }
    }

    /// Category scored on this step, if any.
    pub fn category(self) -> Option<Category> {
        match self {
            WizardStep::ValueToCitizens => Some(Category::ValueToCitizens),
            WizardStep::Feasibility => Some(Category::Feasibility),
            WizardStep::EconomicImpact => Some(Category::EconomicImpact),
            WizardStep::PoliticalAlignment => Some(Category::PoliticalAlignment),
            WizardStep::ServiceSelection | WizardStep::Review => None,
        }
    }

    /// One-based position for "Step n of 6" indicators.
    pub fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|step| *step == self)
            .map_or(0, |index| index + 1)
    }
}

/// In-progress form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentDraft {
    /// Selected catalog value; empty until chosen.
    pub service_value: String,
    pub other_service_name: String,
    pub submitter_name: String,
    pub scores: ScoreSheet,
}

impl Default for AssessmentDraft {
    fn default() -> Self {
        Self {
            service_value: String::new(),
            other_service_name: String::new(),
            submitter_name: String::new(),
            scores: ScoreSheet::uniform(Score::NEUTRAL),
        }
    }
}

/// Guard for leaving [`WizardStep::ServiceSelection`].
pub fn service_selected(draft: &AssessmentDraft) -> bool {
    match draft.service_value.trim() {
        "" => false,
        OTHER_SERVICE_VALUE => !draft.other_service_name.trim().is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("select a service or name the service being evaluated")]
    ServiceNotSelected,
    #[error("'{0}' is not one of the offered services")]
    UnknownService(String),
    #[error("already on the first step")]
    AtFirstStep,
    #[error("already on the review step")]
    AtLastStep,
    #[error("the submission can only be prepared from the review step")]
    NotReviewing,
    #[error("{} must be between 1 and 5, found {value}", .field.key())]
    ScoreOutOfRange { field: ScoreField, value: u8 },
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Figures shown on the review step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub service_name: String,
    pub submitter_name: String,
    pub scorecard: Scorecard,
}

/// One user's pass through the wizard.
#[derive(Debug, Clone)]
pub struct WizardSession {
    step: WizardStep,
    draft: AssessmentDraft,
    options: Vec<ServiceOption>,
}

impl WizardSession {
    /// Start a session offering `options` (see `catalog::selectable_options`).
    pub fn new(options: Vec<ServiceOption>) -> Self {
        Self {
            step: WizardStep::ServiceSelection,
            draft: AssessmentDraft::default(),
            options,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    pub fn options(&self) -> &[ServiceOption] {
        &self.options
    }

    pub fn select_service(&mut self, value: &str) -> Result<(), WizardError> {
        let known = value == OTHER_SERVICE_VALUE
            || self.options.iter().any(|option| option.value == value);
        if !known {
            return Err(WizardError::UnknownService(value.to_string()));
        }
        self.draft.service_value = value.to_string();
        Ok(())
    }

    pub fn set_other_service_name(&mut self, name: &str) {
        self.draft.other_service_name = name.to_string();
    }

    pub fn set_submitter_name(&mut self, name: &str) {
        self.draft.submitter_name = name.to_string();
    }

    pub fn set_score(&mut self, field: ScoreField, value: u8) -> Result<(), WizardError> {
        let score = Score::new(value).ok_or(WizardError::ScoreOutOfRange { field, value })?;
        self.draft.scores.set(field, score);
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::ServiceSelection => service_selected(&self.draft),
            WizardStep::Review => false,
            _ => true,
        }
    }

    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        if self.step == WizardStep::ServiceSelection && !service_selected(&self.draft) {
            return Err(WizardError::ServiceNotSelected);
        }
        self.step = self.step.next().ok_or(WizardError::AtLastStep)?;
        Ok(self.step)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.step = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        Ok(self.step)
    }

    /// Name recorded for the assessed service: the free text for "other",
    /// otherwise the catalog label.
    pub fn resolved_service_name(&self) -> Option<String> {
        let value = self.draft.service_value.trim();
        if value == OTHER_SERVICE_VALUE {
            let name = self.draft.other_service_name.trim();
            return (!name.is_empty()).then(|| name.to_string());
        }

        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.clone())
    }

    pub fn review(&self) -> Result<ReviewSummary, WizardError> {
        let scorecard = Scorecard::compute(&self.draft.scores)?;
        let submitter = self.draft.submitter_name.trim();

        Ok(ReviewSummary {
            service_name: self
                .resolved_service_name()
                .unwrap_or_else(|| "Not selected".to_string()),
            submitter_name: if submitter.is_empty() {
                ANONYMOUS.to_string()
            } else {
                submitter.to_string()
            },
            scorecard,
        })
    }

    /// JSON body for the submit endpoint, stamped with `now`.
    pub fn submission_payload(&self, now: DateTime<Utc>) -> Result<Value, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotReviewing);
        }
        let service_name = self
            .resolved_service_name()
            .ok_or(WizardError::ServiceNotSelected)?;

        let mut payload = Map::new();
        payload.insert("serviceName".to_string(), Value::from(service_name));
        payload.insert(
            "submitterName".to_string(),
            Value::from(self.draft.submitter_name.trim()),
        );
        payload.insert("timestamp".to_string(), Value::from(format_timestamp(now)));
        for (field, score) in self.draft.scores.iter() {
            payload.insert(field.key().to_string(), Value::from(score.value()));
        }

        Ok(Value::Object(payload))
    }

    /// Return to the first step with default scores, keeping the options.
    pub fn reset(&mut self) {
        self.step = WizardStep::ServiceSelection;
        self.draft = AssessmentDraft::default();
    }
}
