use crate::eligibility::CandidateSet;
use crate::types::GradedItem;

pub fn select_eligible(items: &[GradedItem], threshold: f64) -> CandidateSet {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_eligible(threshold))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::select_eligible;
    use crate::eligibility::DEFAULT_PASS_THRESHOLD;
    use crate::types::GradedItem;

    #[test]
    fn keeps_input_order_and_inclusive_threshold() {
        let items = vec![
            GradedItem::new("A", 10.0, 40.0),
            GradedItem::new("B", 10.0, 90.0),
            GradedItem::new("C", 10.0, 55.0),
            GradedItem::new("D", 10.0, 54.9),
        ];
        let set = select_eligible(&items, DEFAULT_PASS_THRESHOLD);
        assert_eq!(set.indices(), &[1, 2]);
    }

    #[test]
    fn duplicate_identifiers_stay_distinct() {
        let items = vec![
            GradedItem::new("Lab", 2.0, 80.0),
            GradedItem::new("Lab", 2.0, 70.0),
        ];
        let set = select_eligible(&items, DEFAULT_PASS_THRESHOLD);
        assert_eq!(set.indices(), &[0, 1]);
    }

    #[test]
    fn empty_input_has_no_candidates() {
        assert!(select_eligible(&[], 55.0).is_empty());
    }
}
