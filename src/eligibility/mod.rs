pub mod filter;

use serde::{Deserialize, Serialize};

pub use filter::select_eligible;

pub const DEFAULT_PASS_THRESHOLD: f64 = 55.0;

/// Positions of current items that may be converted to Pass/Fail, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSet {
    indices: Vec<usize>,
}

impl CandidateSet {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of conversions usable this term, never more than there are candidates.
    pub fn pass_limit(&self, passes_available: usize) -> usize {
        passes_available.min(self.indices.len())
    }
}

impl From<Vec<usize>> for CandidateSet {
    fn from(indices: Vec<usize>) -> Self {
        Self { indices }
    }
}
