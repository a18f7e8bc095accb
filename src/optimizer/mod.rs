
pub mod exhaustive;
pub mod greedy;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::average::WeightedTotals;
use crate::types::{Aggregate, GradedItem};

pub use exhaustive::exhaustive;
pub use greedy::greedy;

/// `pass_limit` is expected to be already clamped to `candidates.len()`.
#[derive(Debug, Clone, Copy)]
pub struct SubsetProblem<'a> {
    pub aggregates: &'a [Aggregate],
    pub items: &'a [GradedItem],
    pub candidates: &'a [usize],
    pub pass_limit: usize,
}

/// A subset of candidate indices and the average left once they are removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub indices: Vec<usize>,
    pub average: f64,
}

impl<'a> SubsetProblem<'a> {
    pub fn new(
        aggregates: &'a [Aggregate],
        items: &'a [GradedItem],
        candidates: &'a [usize],
        pass_limit: usize,
    ) -> Self {
        Self {
            aggregates,
            items,
            candidates,
            pass_limit: pass_limit.min(candidates.len()),
        }
    }

    pub fn baseline(&self) -> WeightedTotals {
        self.remaining_totals(&[])
    }

    // Summed in input order so a subset's average does not depend on index order.
    pub fn remaining_totals(&self, removed: &[usize]) -> WeightedTotals {
        let mut skip = vec![false; self.items.len()];
        for &idx in removed {
            skip[idx] = true;
        }
        let mut totals = WeightedTotals::accumulate(self.aggregates);
        for (item, skipped) in self.items.iter().zip(skip) {
            if !skipped {
                totals.add(item);
            }
        }
        totals
    }

    pub fn result_average(&self, removed: &[usize]) -> f64 {
        self.remaining_totals(removed).average()
    }

    pub fn selection(&self, indices: Vec<usize>) -> Selection {
        let average = self.result_average(&indices);
        Selection { indices, average }
    }

    /// Lowest grade first, input order among equal grades.
    pub fn removal_order(&self, indices: &mut [usize]) {
        indices.sort_by(|a, b| self.by_grade(*a, *b));
    }

    fn by_grade(&self, a: usize, b: usize) -> Ordering {
        self.items[a]
            .grade
            .total_cmp(&self.items[b].grade)
            .then(a.cmp(&b))
    }
}
