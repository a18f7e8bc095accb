use crate::average::WeightedTotals;
use crate::types::{Aggregate, GradedItem};

/// Rolls several semester summaries into one. `None` when no credit was earned.
pub fn combine_aggregates(semesters: &[Aggregate]) -> Option<Aggregate> {
    rollup(WeightedTotals::accumulate(semesters))
}

pub fn aggregate_courses(courses: &[GradedItem]) -> Option<Aggregate> {
    rollup(WeightedTotals::accumulate(courses))
}

fn rollup(totals: WeightedTotals) -> Option<Aggregate> {
    if totals.credit_weight > 0.0 {
        Some(Aggregate::new(totals.average(), totals.credit_weight))
    } else {
        None
    }
}
