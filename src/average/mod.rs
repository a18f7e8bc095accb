pub mod aggregate;

use serde::{Deserialize, Serialize};

use crate::types::{Aggregate, GradedItem};

pub use aggregate::{aggregate_courses, combine_aggregates};

/// Anything that contributes a grade and a credit weight to an average.
pub trait Weighted {
    fn grade(&self) -> f64;
    fn credit_weight(&self) -> f64;
}

impl Weighted for (f64, f64) {
    fn grade(&self) -> f64 {
        self.0
    }

    fn credit_weight(&self) -> f64 {
        self.1
    }
}

impl Weighted for GradedItem {
    fn grade(&self) -> f64 {
        self.grade
    }

    fn credit_weight(&self) -> f64 {
        self.credit_weight
    }
}

impl Weighted for Aggregate {
    fn grade(&self) -> f64 {
        self.average
    }

    fn credit_weight(&self) -> f64 {
        self.credit_weight
    }
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn grade(&self) -> f64 {
        (**self).grade()
    }

    fn credit_weight(&self) -> f64 {
        (**self).credit_weight()
    }
}

/// Running numerator and denominator of a weighted average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedTotals {
    pub weighted_sum: f64,
    pub credit_weight: f64,
}

impl WeightedTotals {
    pub fn accumulate<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Weighted,
    {
        let mut totals = Self::default();
        for item in items {
            totals.add(&item);
        }
        totals
    }

    pub fn add(&mut self, item: &impl Weighted) {
        self.weighted_sum += item.grade() * item.credit_weight();
        self.credit_weight += item.credit_weight();
    }

    /// Zero credit yields `0.0` instead of a division by zero.
    pub fn average(&self) -> f64 {
        if self.credit_weight == 0.0 {
            return 0.0;
        }
        self.weighted_sum / self.credit_weight
    }
}

pub fn compute_average<I>(items: I) -> f64
where
    I: IntoIterator,
    I::Item: Weighted,
{
    WeightedTotals::accumulate(items).average()
}

#[cfg(test)]
mod tests {
    use super::{compute_average, WeightedTotals};
    use crate::types::{Aggregate, GradedItem};

    #[test]
    fn empty_and_zero_credit_inputs_average_to_zero() {
        assert_eq!(compute_average(Vec::<(f64, f64)>::new()), 0.0);
        assert_eq!(compute_average([(87.0, 0.0), (42.0, 0.0)]), 0.0);
    }

    #[test]
    fn weights_grades_by_credit() {
        let avg = compute_average([(60.0, 10.0), (95.0, 10.0), (58.0, 10.0)]);
        assert_eq!(avg, 71.0);

        let avg = compute_average([(100.0, 3.0), (50.0, 1.0)]);
        assert!((avg - 87.5).abs() < 1e-12);
    }

    #[test]
    fn aggregate_counts_like_an_item_with_its_average() {
        let items = [
            GradedItem::new("calculus", 5.0, 72.0),
            GradedItem::new("physics", 4.0, 91.0),
        ];
        let as_aggregates: Vec<Aggregate> = items
            .iter()
            .map(|item| Aggregate::new(item.grade, item.credit_weight))
            .collect();
        assert_eq!(compute_average(&items), compute_average(&as_aggregates));
    }

    #[test]
    fn totals_track_sum_and_credit() {
        let totals = WeightedTotals::accumulate([(80.0, 60.0), (40.0, 10.0)]);
        assert_eq!(totals.weighted_sum, 5_200.0);
        assert_eq!(totals.credit_weight, 70.0);
        assert_eq!(WeightedTotals::default().average(), 0.0);
    }
}
