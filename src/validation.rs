use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::average::WeightedTotals;
use crate::types::{Aggregate, GradedItem};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GradeBounds {
    pub min: f64,
    pub max: f64,
}

impl GradeBounds {
    pub const PERCENT: GradeBounds = GradeBounds {
        min: 0.0,
        max: 100.0,
    };

    pub fn contains(&self, grade: f64) -> bool {
        (self.min..=self.max).contains(&grade)
    }
}

impl Default for GradeBounds {
    fn default() -> Self {
        Self::PERCENT
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    PastAggregate,
    CurrentItem,
    Pair,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::PastAggregate => "past aggregate",
            Self::CurrentItem => "current item",
            Self::Pair => "pair",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{entry} #{index} has negative credit weight {value}")]
    NegativeCreditWeight {
        entry: EntryKind,
        index: usize,
        value: f64,
    },
    #[error("{entry} #{index} has a non-finite credit weight")]
    NonFiniteCreditWeight { entry: EntryKind, index: usize },
    #[error("{entry} #{index} has grade {value} outside [{min}, {max}]")]
    GradeOutOfRange {
        entry: EntryKind,
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("passes available must be non-negative, got {value}")]
    InvalidPassCount { value: i64 },
    #[error("weighted totals overflow (sum {weighted_sum}, credit {credit_weight})")]
    TotalsOverflow {
        weighted_sum: f64,
        credit_weight: f64,
    },
}

pub fn validate_aggregates(
    aggregates: &[Aggregate],
    bounds: GradeBounds,
) -> Result<(), ValidationError> {
    for (index, aggregate) in aggregates.iter().enumerate() {
        check_entry(
            EntryKind::PastAggregate,
            index,
            aggregate.credit_weight,
            aggregate.average,
            bounds,
        )?;
    }
    Ok(())
}

pub fn validate_items(items: &[GradedItem], bounds: GradeBounds) -> Result<(), ValidationError> {
    for (index, item) in items.iter().enumerate() {
        check_entry(
            EntryKind::CurrentItem,
            index,
            item.credit_weight,
            item.grade,
            bounds,
        )?;
    }
    Ok(())
}

/// Checks bare `(grade, credit_weight)` pairs, including their combined totals.
pub fn validate_pairs(pairs: &[(f64, f64)], bounds: GradeBounds) -> Result<(), ValidationError> {
    for (index, &(grade, credit_weight)) in pairs.iter().enumerate() {
        check_entry(EntryKind::Pair, index, credit_weight, grade, bounds)?;
    }
    validate_totals(&WeightedTotals::accumulate(pairs))
}

pub fn validate_totals(totals: &WeightedTotals) -> Result<(), ValidationError> {
    if totals.weighted_sum.is_finite() && totals.credit_weight.is_finite() {
        return Ok(());
    }
    Err(ValidationError::TotalsOverflow {
        weighted_sum: totals.weighted_sum,
        credit_weight: totals.credit_weight,
    })
}

pub fn validate_pass_count(passes_available: i64) -> Result<usize, ValidationError> {
    usize::try_from(passes_available).map_err(|_| ValidationError::InvalidPassCount {
        value: passes_available,
    })
}

fn check_entry(
    entry: EntryKind,
    index: usize,
    credit_weight: f64,
    grade: f64,
    bounds: GradeBounds,
) -> Result<(), ValidationError> {
    if !credit_weight.is_finite() {
        return Err(ValidationError::NonFiniteCreditWeight { entry, index });
    }
    if credit_weight < 0.0 {
        return Err(ValidationError::NegativeCreditWeight {
            entry,
            index,
            value: credit_weight,
        });
    }
    if !bounds.contains(grade) {
        return Err(ValidationError::GradeOutOfRange {
            entry,
            index,
            value: grade,
            min: bounds.min,
            max: bounds.max,
        });
    }
    Ok(())
}
