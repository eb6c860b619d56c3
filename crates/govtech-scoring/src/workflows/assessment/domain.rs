use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the record store to a persisted submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four fixed scoring categories, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ValueToCitizens,
    Feasibility,
    EconomicImpact,
    PoliticalAlignment,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ValueToCitizens,
        Category::Feasibility,
        Category::EconomicImpact,
        Category::PoliticalAlignment,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ValueToCitizens => "Value to Citizens",
            Category::Feasibility => "Feasibility",
            Category::EconomicImpact => "Economic Impact",
            Category::PoliticalAlignment => "Political Alignment",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Category::ValueToCitizens => "Assess the direct benefit to Barbadian citizens",
            Category::Feasibility => "Can we realistically deliver this service?",
            Category::EconomicImpact => "How does this strengthen Barbados's economy?",
            Category::PoliticalAlignment => "Strategic alignment and government priorities",
        }
    }

    /// Column holding the category average in the submissions table.
    pub fn average_column(self) -> &'static str {
        match self {
            Category::ValueToCitizens => "Value to Citizens Avg",
            Category::Feasibility => "Feasibility Avg",
            Category::EconomicImpact => "Economic Impact Avg",
            Category::PoliticalAlignment => "Political Alignment Avg",
        }
    }

    pub fn fields(self) -> &'static [ScoreField] {
        use ScoreField::*;
        match self {
            Category::ValueToCitizens => &[
                TransactionVolume,
                PainLevel,
                TimeSaved,
                Frequency,
                EquityImpact,
                Mandatory,
            ],
            Category::Feasibility => &[
                TechnicalComplexity,
                DataReadiness,
                Stakeholders,
                LegalBarriers,
                TeamCapability,
                InfrastructureLeverage,
                TimeToLaunch,
            ],
            Category::EconomicImpact => &[
                RevenueGeneration,
                CostSavings,
                BusinessEnablement,
                SectorCriticality,
                TradeFacilitation,
                MultiplierEffect,
                EodbImpact,
            ],
            Category::PoliticalAlignment => &[
                ManifestoMentions,
                MinisterialPriority,
                ExecutiveSponsorship,
                BudgetSignals,
                DevPlanAlignment,
                PublicCommitment,
                TimingSensitivity,
            ],
        }
    }
}

/// One of the 27 scored questions. Declaration order matches `FIELD_SPECS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreField {
    TransactionVolume,
    PainLevel,
    TimeSaved,
    Frequency,
    EquityImpact,
    Mandatory,
    TechnicalComplexity,
    DataReadiness,
    Stakeholders,
    LegalBarriers,
    TeamCapability,
    InfrastructureLeverage,
    TimeToLaunch,
    RevenueGeneration,
    CostSavings,
    BusinessEnablement,
    SectorCriticality,
    TradeFacilitation,
    MultiplierEffect,
    EodbImpact,
    ManifestoMentions,
    MinisterialPriority,
    ExecutiveSponsorship,
    BudgetSignals,
    DevPlanAlignment,
    PublicCommitment,
    TimingSensitivity,
}

/// Naming and rubric text for a score field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: ScoreField,
    /// camelCase key used by the submit payload.
    pub key: &'static str,
    /// Column name in the submissions table.
    pub column: &'static str,
    pub category: Category,
    pub prompt: &'static str,
    pub guidance: &'static str,
}

const fn spec(
    field: ScoreField,
    key: &'static str,
    column: &'static str,
    category: Category,
    prompt: &'static str,
    guidance: &'static str,
) -> FieldSpec {
    FieldSpec {
        field,
        key,
        column,
        category,
        prompt,
        guidance,
    }
}

const FIELD_SPECS: [FieldSpec; 27] = [
    // Value to Citizens
    spec(
        ScoreField::TransactionVolume,
        "transactionVolume",
        "Transaction Volume",
        Category::ValueToCitizens,
        "Annual Transaction Volume",
        "1 = <1,000 users • 2 = 1,000-5,000 • 3 = 5,000-20,000 • 4 = 20,000-50,000 • 5 = >50,000 users",
    ),
    spec(
        ScoreField::PainLevel,
        "painLevel",
        "Pain Level",
        Category::ValueToCitizens,
        "Current Pain Level",
        "How frustrating is the existing process? Consider wait times, number of visits required, form complexity, and travel burden.",
    ),
    spec(
        ScoreField::TimeSaved,
        "timeSaved",
        "Time Saved",
        Category::ValueToCitizens,
        "Time Saved per Transaction",
        "1 = <30 minutes saved • 2 = 30-60 min • 3 = 1-3 hours • 4 = 3-8 hours • 5 = >8 hours or multiple days",
    ),
    spec(
        ScoreField::Frequency,
        "frequency",
        "Frequency",
        Category::ValueToCitizens,
        "Frequency of Need",
        "1 = Once in lifetime • 2 = Every few years • 3 = Annually • 4 = Quarterly • 5 = Monthly or weekly",
    ),
    spec(
        ScoreField::EquityImpact,
        "equityImpact",
        "Equity Impact",
        Category::ValueToCitizens,
        "Equity Impact",
        "Does it serve vulnerable/underserved populations, rural communities, or reduce the digital divide?",
    ),
    spec(
        ScoreField::Mandatory,
        "mandatory",
        "Mandatory",
        Category::ValueToCitizens,
        "Mandatory vs Optional",
        "5 = Required by law/regulation • 3 = Highly beneficial but optional • 1 = Nice-to-have convenience",
    ),
    // Feasibility
    spec(
        ScoreField::TechnicalComplexity,
        "technicalComplexity",
        "Technical Complexity",
        Category::Feasibility,
        "Technical Complexity",
        "5 = Simple forms/workflows • 3 = Moderate system integrations • 1 = Complex multi-system architecture",
    ),
    spec(
        ScoreField::DataReadiness,
        "dataReadiness",
        "Data Readiness",
        Category::Feasibility,
        "Data Readiness",
        "5 = Already digitized and accessible • 3 = Partially digitized • 1 = Paper-based, needs full digitization",
    ),
    spec(
        ScoreField::Stakeholders,
        "stakeholders",
        "Stakeholders",
        Category::Feasibility,
        "Number of Stakeholders",
        "5 = Single department • 4 = 2 departments • 3 = 3 departments • 2 = 4-5 departments • 1 = 6+ departments",
    ),
    spec(
        ScoreField::LegalBarriers,
        "legalBarriers",
        "Legal Barriers",
        Category::Feasibility,
        "Legal/Regulatory Barriers",
        "5 = No legal changes needed • 3 = Policy updates only • 1 = Requires new legislation",
    ),
    spec(
        ScoreField::TeamCapability,
        "teamCapability",
        "Team Capability",
        Category::Feasibility,
        "Team Capability Match",
        "5 = Fully in-house capability • 3 = Need some external help • 1 = Need significant external expertise",
    ),
    spec(
        ScoreField::InfrastructureLeverage,
        "infrastructureLeverage",
        "Infrastructure Leverage",
        Category::Feasibility,
        "Infrastructure Leverage",
        "5 = Build extensively on existing platforms • 3 = Some reuse possible • 1 = Must build from scratch",
    ),
    spec(
        ScoreField::TimeToLaunch,
        "timeToLaunch",
        "Time to Launch",
        Category::Feasibility,
        "Estimated Time to Launch",
        "5 = <3 months • 4 = 3-6 months • 3 = 6-12 months • 2 = 12-18 months • 1 = >18 months",
    ),
    // Economic Impact
    spec(
        ScoreField::RevenueGeneration,
        "revenueGeneration",
        "Revenue Generation",
        Category::EconomicImpact,
        "Revenue Generation Potential (BBD)",
        "1 = None • 2 = <$100K • 3 = $100K-$500K • 4 = $500K-$2M • 5 = >$2M annually",
    ),
    spec(
        ScoreField::CostSavings,
        "costSavings",
        "Cost Savings",
        Category::EconomicImpact,
        "Cost Savings (Operational)",
        "Annual savings from reduced staff time, physical infrastructure, printing, etc.",
    ),
    spec(
        ScoreField::BusinessEnablement,
        "businessEnablement",
        "Business Enablement",
        Category::EconomicImpact,
        "Business Enablement",
        "5 = Directly unlocks business creation/FDI • 4 = Significantly reduces business friction • 1 = No direct business impact",
    ),
    spec(
        ScoreField::SectorCriticality,
        "sectorCriticality",
        "Sector Criticality",
        Category::EconomicImpact,
        "Sector Criticality",
        "5 = Supports core sector (tourism/financial services) • 3 = Important sector • 1 = Low economic priority",
    ),
    spec(
        ScoreField::TradeFacilitation,
        "tradeFacilitation",
        "Trade Facilitation",
        Category::EconomicImpact,
        "Trade/Diaspora Facilitation",
        "Does it enable imports/exports, remittances, or diaspora engagement?",
    ),
    spec(
        ScoreField::MultiplierEffect,
        "multiplierEffect",
        "Multiplier Effect",
        Category::EconomicImpact,
        "Multiplier Effect",
        "5 = Creates highly reusable platform components • 3 = Some reusability • 1 = Standalone service only",
    ),
    spec(
        ScoreField::EodbImpact,
        "eodbImpact",
        "EODB Impact",
        Category::EconomicImpact,
        "Ease of Doing Business (EODB) Impact",
        "5 = Directly affects World Bank EODB indicators • 3 = Indirectly relevant • 1 = Not relevant",
    ),
    // Political Alignment
    spec(
        ScoreField::ManifestoMentions,
        "manifestoMentions",
        "Manifesto Mentions",
        Category::PoliticalAlignment,
        "Manifesto/Policy Document Mentions",
        "5 = Explicitly in manifesto/throne speech • 3 = Implied in policy docs • 1 = Not mentioned",
    ),
    spec(
        ScoreField::MinisterialPriority,
        "ministerialPriority",
        "Ministerial Priority",
        Category::PoliticalAlignment,
        "Ministerial Priority Level",
        "5 = Top 3 priority for minister • 3 = Important but not top tier • 1 = Low ministerial attention",
    ),
    spec(
        ScoreField::ExecutiveSponsorship,
        "executiveSponsorship",
        "Executive Sponsorship",
        Category::PoliticalAlignment,
        "Executive Sponsorship",
        "5 = PM/Cabinet champion • 4 = Minister • 3 = Permanent Secretary • 2 = Dept head • 1 = None",
    ),
    spec(
        ScoreField::BudgetSignals,
        "budgetSignals",
        "Budget Signals",
        Category::PoliticalAlignment,
        "Budget Signals",
        "5 = Already budgeted • 3 = Budget request submitted • 1 = No budget allocation yet",
    ),
    spec(
        ScoreField::DevPlanAlignment,
        "devPlanAlignment",
        "Dev Plan Alignment",
        Category::PoliticalAlignment,
        "National Development Plan Alignment",
        "5 = Direct alignment with development strategy/SDGs • 3 = Indirect support • 1 = Not aligned",
    ),
    spec(
        ScoreField::PublicCommitment,
        "publicCommitment",
        "Public Commitment",
        Category::PoliticalAlignment,
        "Public Commitment/Visibility",
        "5 = Public announcement made • 3 = Mentioned in speeches • 1 = Not publicly discussed",
    ),
    spec(
        ScoreField::TimingSensitivity,
        "timingSensitivity",
        "Timing Sensitivity",
        Category::PoliticalAlignment,
        "Timing Sensitivity",
        "5 = Electoral deadline • 4 = Treaty obligation • 3 = Desirable timing • 1 = No time pressure",
    ),
];

impl ScoreField {
    pub fn all() -> impl Iterator<Item = ScoreField> {
        FIELD_SPECS.iter().map(|spec| spec.field)
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn column(self) -> &'static str {
        self.spec().column
    }

    pub fn category(self) -> Category {
        self.spec().category
    }

    pub fn from_key(key: &str) -> Option<Self> {
        FIELD_SPECS
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.field)
    }

    pub fn from_column(column: &str) -> Option<Self> {
        FIELD_SPECS
            .iter()
            .find(|spec| spec.column == column)
            .map(|spec| spec.field)
    }
}

/// A single rating on the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Starting value for every slider in the form.
    pub const NEUTRAL: Score = Score(3);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Raw ratings keyed by field. May be incomplete until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSheet {
    scores: BTreeMap<ScoreField, Score>,
}

impl ScoreSheet {
    /// Every field set to the same value.
    pub fn uniform(score: Score) -> Self {
        Self {
            scores: ScoreField::all().map(|field| (field, score)).collect(),
        }
    }

    pub fn set(&mut self, field: ScoreField, score: Score) {
        self.scores.insert(field, score);
    }

    pub fn with(mut self, field: ScoreField, score: Score) -> Self {
        self.set(field, score);
        self
    }

    pub fn remove(&mut self, field: ScoreField) -> Option<Score> {
        self.scores.remove(&field)
    }

    pub fn get(&self, field: ScoreField) -> Option<Score> {
        self.scores.get(&field).copied()
    }

    pub fn missing(&self) -> Vec<ScoreField> {
        ScoreField::all()
            .filter(|field| !self.scores.contains_key(field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.scores.len() == FIELD_SPECS.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreField, Score)> + '_ {
        self.scores.iter().map(|(field, score)| (*field, *score))
    }
}

impl FromIterator<(ScoreField, Score)> for ScoreSheet {
    fn from_iter<I: IntoIterator<Item = (ScoreField, Score)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// A validated assessment ready for aggregation and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentSubmission {
    /// Resolved display name: catalog label or the free-text "other" entry.
    pub service_name: String,
    pub submitter_name: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub scores: ScoreSheet,
}

/// Category averages and the overall score derived from a `ScoreSheet`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub value_to_citizens: f64,
    pub feasibility: f64,
    pub economic_impact: f64,
    pub political_alignment: f64,
    pub overall: f64,
}

impl Scorecard {
    pub fn category(&self, category: Category) -> f64 {
        match category {
            Category::ValueToCitizens => self.value_to_citizens,
            Category::Feasibility => self.feasibility,
            Category::EconomicImpact => self.economic_impact,
            Category::PoliticalAlignment => self.political_alignment,
        }
    }
}

/// Identifier returned to callers after a successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub record_id: RecordId,
}
