use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::average::{compute_average, WeightedTotals};
use crate::eligibility::{select_eligible, CandidateSet, DEFAULT_PASS_THRESHOLD};
use crate::optimizer::{exhaustive, greedy, Selection, SubsetProblem};
use crate::types::{Aggregate, GradedItem};
use crate::validation::{
    validate_aggregates, validate_items, validate_pass_count, validate_totals, GradeBounds,
    ValidationError,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub past_aggregates: Vec<Aggregate>,
    #[serde(default)]
    pub current_items: Vec<GradedItem>,
    #[serde(default)]
    pub passes_available: i64,
    #[serde(default)]
    pub pass_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub pre_semester_average: f64,
    pub all_graded_average: f64,
    pub optimized_average: f64,
    pub chosen_identifiers: Vec<String>,
    pub chosen_indices: Vec<usize>,
    pub eligible_indices: Vec<usize>,
    pub pass_limit: usize,
    pub pass_threshold: f64,
}

impl OptimizationReport {
    pub fn improvement(&self) -> f64 {
        self.optimized_average - self.all_graded_average
    }

    pub fn is_chosen(&self, index: usize) -> bool {
        self.chosen_indices.contains(&index)
    }
}

/// Greedy and exhaustive answers for the same request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossCheck {
    pub candidate_count: usize,
    pub pass_limit: usize,
    pub greedy: Selection,
    pub exhaustive: Selection,
    pub agrees: bool,
}

/// Validated request, ready for the optimizer.
struct Prepared<'a> {
    request: &'a PlanRequest,
    threshold: f64,
    candidates: CandidateSet,
    pass_limit: usize,
}

impl Prepared<'_> {
    fn problem(&self) -> SubsetProblem<'_> {
        SubsetProblem::new(
            &self.request.past_aggregates,
            &self.request.current_items,
            self.candidates.indices(),
            self.pass_limit,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Planner {
    pub bounds: GradeBounds,
    pub default_threshold: f64,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            bounds: GradeBounds::default(),
            default_threshold: DEFAULT_PASS_THRESHOLD,
        }
    }
}

impl Planner {
    pub fn new(bounds: GradeBounds, default_threshold: f64) -> Self {
        Self {
            bounds,
            default_threshold,
        }
    }

    pub fn plan(&self, request: &PlanRequest) -> Result<OptimizationReport, ValidationError> {
        let prepared = self.prepare(request)?;
        let problem = prepared.problem();
        let best = greedy(&problem);

        info!(
            eligible = prepared.candidates.len(),
            pass_limit = prepared.pass_limit,
            chosen = best.indices.len(),
            "planned binary passes"
        );

        Ok(OptimizationReport {
            pre_semester_average: compute_average(&request.past_aggregates),
            all_graded_average: problem.baseline().average(),
            optimized_average: best.average,
            chosen_identifiers: best
                .indices
                .iter()
                .map(|&idx| request.current_items[idx].identifier.clone())
                .collect(),
            chosen_indices: best.indices,
            eligible_indices: prepared.candidates.indices().to_vec(),
            pass_limit: prepared.pass_limit,
            pass_threshold: prepared.threshold,
        })
    }

    /// Runs both searches. Refuses when there are more candidates than `max_candidates`.
    pub fn cross_check(
        &self,
        request: &PlanRequest,
        max_candidates: usize,
    ) -> anyhow::Result<CrossCheck> {
        let prepared = self.prepare(request)?;
        if prepared.candidates.len() > max_candidates {
            anyhow::bail!(
                "{} eligible items exceed the exhaustive search cap of {max_candidates}",
                prepared.candidates.len()
            );
        }
        let problem = prepared.problem();
        let greedy = greedy(&problem);
        let mut exhaustive = exhaustive(&problem);
        problem.removal_order(&mut exhaustive.indices);
        let agrees = greedy.average == exhaustive.average;
        debug!(agrees, greedy = greedy.average, exhaustive = exhaustive.average, "cross-check");

        Ok(CrossCheck {
            candidate_count: prepared.candidates.len(),
            pass_limit: prepared.pass_limit,
            greedy,
            exhaustive,
            agrees,
        })
    }

    pub fn eligible(&self, request: &PlanRequest) -> Result<CandidateSet, ValidationError> {
        Ok(self.prepare(request)?.candidates)
    }

    fn prepare<'a>(&self, request: &'a PlanRequest) -> Result<Prepared<'a>, ValidationError> {
        validate_aggregates(&request.past_aggregates, self.bounds)?;
        validate_items(&request.current_items, self.bounds)?;
        let mut totals = WeightedTotals::accumulate(&request.past_aggregates);
        for item in &request.current_items {
            totals.add(item);
        }
        validate_totals(&totals)?;
        let passes = validate_pass_count(request.passes_available)?;

        let threshold = request.pass_threshold.unwrap_or(self.default_threshold);
        let candidates = select_eligible(&request.current_items, threshold);
        let pass_limit = candidates.pass_limit(passes);
        Ok(Prepared {
            request,
            threshold,
            candidates,
            pass_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PlanRequest, Planner};
    use crate::types::{Aggregate, GradedItem};
    use crate::validation::ValidationError;

    fn scenario_one(passes: i64) -> PlanRequest {
        PlanRequest {
            past_aggregates: Vec::new(),
            current_items: vec![
                GradedItem::new("X", 10.0, 60.0),
                GradedItem::new("Y", 10.0, 95.0),
                GradedItem::new("Z", 10.0, 58.0),
            ],
            passes_available: passes,
            pass_threshold: Some(55.0),
        }
    }

    #[test]
    fn scenario_without_past_history() {
        let report = Planner::default().plan(&scenario_one(2)).expect("plan failed");
        assert_eq!(report.pre_semester_average, 0.0);
        assert_eq!(report.all_graded_average, 71.0);
        assert_eq!(report.chosen_identifiers, vec!["Z", "X"]);
        assert_eq!(report.optimized_average, 95.0);
        assert_eq!(report.improvement(), 24.0);
    }

    #[test]
    fn scenario_where_conversion_cannot_help() {
        let request = PlanRequest {
            past_aggregates: vec![Aggregate::new(80.0, 60.0)],
            current_items: vec![
                GradedItem::new("A", 10.0, 40.0),
                GradedItem::new("B", 10.0, 90.0),
                GradedItem::new("C", 10.0, 50.0),
            ],
            passes_available: 1,
            pass_threshold: None,
        };
        let report = Planner::default().plan(&request).expect("plan failed");
        assert_eq!(report.pre_semester_average, 80.0);
        assert_eq!(report.eligible_indices, vec![1]);
        assert!(report.chosen_identifiers.is_empty());
        assert_eq!(report.optimized_average, report.all_graded_average);
    }

    #[test]
    fn scenario_with_tight_limit() {
        let report = Planner::default().plan(&scenario_one(1)).expect("plan failed");
        assert_eq!(report.chosen_identifiers, vec!["Z"]);
        assert_eq!(report.optimized_average, 77.5);
        assert_eq!(report.pass_limit, 1);
    }

    #[test]
    fn rejects_invalid_input_before_planning() {
        let err = Planner::default().plan(&scenario_one(-2)).unwrap_err();
        assert_eq!(err, ValidationError::InvalidPassCount { value: -2 });
    }

    #[test]
    fn rejects_credits_whose_totals_overflow() {
        let request = PlanRequest {
            past_aggregates: vec![Aggregate::new(100.0, 1e307)],
            current_items: vec![GradedItem::new("a", 1e307, 60.0)],
            passes_available: 1,
            pass_threshold: None,
        };
        let err = Planner::default().plan(&request).unwrap_err();
        assert!(matches!(err, ValidationError::TotalsOverflow { .. }));
    }

    #[test]
    fn cross_check_respects_cap() {
        let planner = Planner::default();
        let check = planner.cross_check(&scenario_one(2), 12).expect("cross-check failed");
        assert!(check.agrees);
        assert_eq!(check.greedy.indices, check.exhaustive.indices);
        assert!(planner.cross_check(&scenario_one(2), 2).is_err());
    }

    #[test]
    fn duplicate_identifiers_are_reported_per_item() {
        let request = PlanRequest {
            past_aggregates: Vec::new(),
            current_items: vec![
                GradedItem::new("Lab", 2.0, 60.0),
                GradedItem::new("Lab", 2.0, 62.0),
                GradedItem::new("Thesis", 8.0, 98.0),
            ],
            passes_available: 2,
            pass_threshold: None,
        };
        let report = Planner::default().plan(&request).expect("plan failed");
        assert_eq!(report.chosen_indices, vec![0, 1]);
        assert_eq!(report.chosen_identifiers, vec!["Lab", "Lab"]);
        assert_eq!(report.optimized_average, 98.0);
    }
}
