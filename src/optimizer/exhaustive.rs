use crate::optimizer::{Selection, SubsetProblem};

/// Tries every subset up to `pass_limit` members, smallest first; the first
/// maximum wins. Exponential, so small inputs only.
pub fn exhaustive(problem: &SubsetProblem<'_>) -> Selection {
    let mut best = problem.selection(Vec::new());
    let n = problem.candidates.len();

    for size in 1..=problem.pass_limit.min(n) {
        let mut positions: Vec<usize> = (0..size).collect();
        loop {
            let subset: Vec<usize> = positions.iter().map(|&p| problem.candidates[p]).collect();
            let average = problem.result_average(&subset);
            if average > best.average {
                best = Selection {
                    indices: subset,
                    average,
                };
            }
            if !next_combination(&mut positions, n) {
                break;
            }
        }
    }

    best
}

/// Advances `positions` to the next k-combination of `0..n` in lexicographic order.
fn next_combination(positions: &mut [usize], n: usize) -> bool {
    let k = positions.len();
    let Some(pivot) = (0..k).rev().find(|&i| positions[i] < n - k + i) else {
        return false;
    };
    positions[pivot] += 1;
    for i in (pivot + 1)..k {
        positions[i] = positions[i - 1] + 1;
    }
    true
}
