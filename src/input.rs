use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::average::{aggregate_courses, combine_aggregates, WeightedTotals};
use crate::planner::PlanRequest;
use crate::types::{Aggregate, GradedItem};
use crate::validation::{
    validate_aggregates, validate_items, validate_totals, GradeBounds, ValidationError,
};

/// How prior performance was recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PastHistory {
    /// Every past course entered one by one.
    Courses { courses: Vec<GradedItem> },
    /// One overall average with the total credit earned so far.
    Overall { average: f64, credit_weight: f64 },
    /// One summary per past semester.
    Semesters { semesters: Vec<Aggregate> },
}

impl PastHistory {
    /// Validates the entries, then reduces them to the aggregates the planner consumes.
    pub fn to_aggregates(&self, bounds: GradeBounds) -> Result<Vec<Aggregate>, ValidationError> {
        let aggregates = match self {
            Self::Courses { courses } => {
                validate_items(courses, bounds)?;
                validate_totals(&WeightedTotals::accumulate(courses))?;
                aggregate_courses(courses).into_iter().collect()
            }
            Self::Overall {
                average,
                credit_weight,
            } => {
                let overall = [Aggregate::new(*average, *credit_weight)];
                validate_aggregates(&overall, bounds)?;
                overall
                    .into_iter()
                    .filter(|a| a.credit_weight > 0.0)
                    .collect()
            }
            Self::Semesters { semesters } => {
                validate_aggregates(semesters, bounds)?;
                validate_totals(&WeightedTotals::accumulate(semesters))?;
                combine_aggregates(semesters).into_iter().collect()
            }
        };
        Ok(aggregates)
    }
}

/// A plan request as written by hand in TOML or JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDocument {
    #[serde(default)]
    pub past: Option<PastHistory>,
    #[serde(default)]
    pub current: Vec<GradedItem>,
    #[serde(default)]
    pub passes_available: i64,
    #[serde(default)]
    pub pass_threshold: Option<f64>,
}

impl PlanDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading plan input: {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&data)
                .with_context(|| format!("failed parsing JSON plan input: {}", path.display()))
        } else {
            Self::from_toml(&data)
                .with_context(|| format!("failed parsing TOML plan input: {}", path.display()))
        }
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn into_request(self, bounds: GradeBounds) -> Result<PlanRequest, ValidationError> {
        let past_aggregates = match &self.past {
            Some(past) => past.to_aggregates(bounds)?,
            None => Vec::new(),
        };
        Ok(PlanRequest {
            past_aggregates,
            current_items: self.current,
            passes_available: self.passes_available,
            pass_threshold: self.pass_threshold,
        })
    }
}
