use tracing::debug;

use crate::optimizer::{Selection, SubsetProblem};

/// Finds the candidates whose removal maximizes the average, by refining a
/// running level until no subset beats it. Indices come back lowest grade first.
pub fn greedy(problem: &SubsetProblem<'_>) -> Selection {
    let mut best = problem.selection(Vec::new());
    if problem.pass_limit == 0 || problem.candidates.is_empty() {
        return best;
    }

    let mut round = 0usize;
    loop {
        round += 1;
        let pick = largest_shortfalls(problem, best.average);
        if pick.is_empty() {
            break;
        }
        let next = problem.selection(pick);
        if next.average <= best.average {
            break;
        }
        debug!(
            round,
            removed = next.indices.len(),
            from = best.average,
            to = next.average,
            "raised running average"
        );
        best = next;
    }

    problem.removal_order(&mut best.indices);
    best
}

fn largest_shortfalls(problem: &SubsetProblem<'_>, level: f64) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = problem
        .candidates
        .iter()
        .filter_map(|&idx| {
            let item = &problem.items[idx];
            let shortfall = item.credit_weight * (level - item.grade);
            (shortfall > 0.0).then_some((idx, shortfall))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then(problem.items[a.0].grade.total_cmp(&problem.items[b.0].grade))
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(problem.pass_limit);
    scored.into_iter().map(|(idx, _)| idx).collect()
}
