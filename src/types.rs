use serde::{Deserialize, Serialize};

/// One past or current course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradedItem {
    pub identifier: String,
    pub credit_weight: f64,
    pub grade: f64,
}

/// A rolled-up bundle of prior performance, e.g. a whole past semester.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Aggregate {
    pub average: f64,
    pub credit_weight: f64,
}

impl GradedItem {
    pub fn new(identifier: impl Into<String>, credit_weight: f64, grade: f64) -> Self {
        Self {
            identifier: identifier.into(),
            credit_weight,
            grade,
        }
    }

    pub fn is_eligible(&self, threshold: f64) -> bool {
        self.grade >= threshold
    }
}

impl Aggregate {
    pub fn new(average: f64, credit_weight: f64) -> Self {
        Self {
            average,
            credit_weight,
        }
    }
}
