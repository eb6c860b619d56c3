//! Category and overall score aggregation.
//!
//! Averages are rounded half away from zero to two decimal places. The overall
//! score is the unweighted mean of the four category means, so a six-question
//! category weighs the same as a seven-question one.

use super::domain::{Category, ScoreField, ScoreSheet, Scorecard};

/// Failure to aggregate a category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("cannot average an empty set of scores")]
    EmptyCategory,
    #[error("score for '{}' is missing", .0.key())]
    MissingScore(ScoreField),
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> Result<f64, AggregationError> {
    if values.is_empty() {
        return Err(AggregationError::EmptyCategory);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Arithmetic mean of raw ratings rounded to two decimals.
pub fn average(scores: &[u8]) -> Result<f64, AggregationError> {
    let values: Vec<f64> = scores.iter().map(|score| f64::from(*score)).collect();
    mean(&values).map(round2)
}

/// Overall score from the four category averages.
pub fn overall_score(category_averages: [f64; 4]) -> f64 {
    round2(category_averages.iter().sum::<f64>() / 4.0)
}

fn category_mean(sheet: &ScoreSheet, category: Category) -> Result<f64, AggregationError> {
    let values = category
        .fields()
        .iter()
        .map(|field| {
            sheet
                .get(*field)
                .map(|score| f64::from(score.value()))
                .ok_or(AggregationError::MissingScore(*field))
        })
        .collect::<Result<Vec<f64>, _>>()?;
    mean(&values)
}

/// Rounded average of one category, failing on the first absent field.
pub fn category_average(sheet: &ScoreSheet, category: Category) -> Result<f64, AggregationError> {
    category_mean(sheet, category).map(round2)
}

impl Scorecard {
    /// Compute all category averages and the overall score.
    ///
    /// The overall score is derived from the unrounded category means and then
    /// rounded once.
    pub fn compute(sheet: &ScoreSheet) -> Result<Self, AggregationError> {
        let value_to_citizens = category_mean(sheet, Category::ValueToCitizens)?;
        let feasibility = category_mean(sheet, Category::Feasibility)?;
        let economic_impact = category_mean(sheet, Category::EconomicImpact)?;
        let political_alignment = category_mean(sheet, Category::PoliticalAlignment)?;

        Ok(Self {
            value_to_citizens: round2(value_to_citizens),
            feasibility: round2(feasibility),
            economic_impact: round2(economic_impact),
            political_alignment: round2(political_alignment),
            overall: overall_score([
                value_to_citizens,
                feasibility,
                economic_impact,
                political_alignment,
            ]),
        })
    }
}
