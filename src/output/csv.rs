use anyhow::Result;

use crate::output::format_average;
use crate::planner::{CrossCheck, OptimizationReport};
use crate::types::GradedItem;

pub fn report_to_csv(
    report: &OptimizationReport,
    items: &[GradedItem],
    decimals: usize,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "index",
        "identifier",
        "credit_weight",
        "grade",
        "eligible",
        "converted",
        "removal_order",
        "pre_semester_average",
        "all_graded_average",
        "optimized_average",
    ])?;
    let pre_semester = format_average(report.pre_semester_average, decimals);
    let all_graded = format_average(report.all_graded_average, decimals);
    let optimized = format_average(report.optimized_average, decimals);
    for (idx, item) in items.iter().enumerate() {
        let removal_order = report
            .chosen_indices
            .iter()
            .position(|&chosen| chosen == idx)
            .map(|pos| (pos + 1).to_string())
            .unwrap_or_default();
        writer.write_record([
            idx.to_string(),
            item.identifier.clone(),
            item.credit_weight.to_string(),
            item.grade.to_string(),
            report.eligible_indices.contains(&idx).to_string(),
            report.is_chosen(idx).to_string(),
            removal_order,
            pre_semester.clone(),
            all_graded.clone(),
            optimized.clone(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn cross_check_to_csv(check: &CrossCheck, decimals: usize) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["search", "average", "indices"])?;
    for (search, selection) in [("greedy", &check.greedy), ("exhaustive", &check.exhaustive)] {
        let indices = selection
            .indices
            .iter()
            .map(|idx| idx.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writer.write_record([
            search.to_string(),
            format_average(selection.average, decimals),
            indices,
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::report_to_csv;
    use crate::planner::OptimizationReport;
    use crate::types::GradedItem;

    fn report() -> OptimizationReport {
        OptimizationReport {
            pre_semester_average: 0.0,
            all_graded_average: 71.0,
            optimized_average: 95.0,
            chosen_identifiers: vec!["Z".to_string(), "X".to_string()],
            chosen_indices: vec![2, 0],
            eligible_indices: vec![0, 1, 2],
            pass_limit: 2,
            pass_threshold: 55.0,
        }
    }

    #[test]
    fn marks_converted_rows_with_removal_order() {
        let items = vec![
            GradedItem::new("X", 10.0, 60.0),
            GradedItem::new("Y", 10.0, 95.0),
            GradedItem::new("Z", 10.0, 58.0),
        ];
        let csv = report_to_csv(&report(), &items, 2).expect("csv failed");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "index,identifier,credit_weight,grade,eligible,converted,removal_order,\
             pre_semester_average,all_graded_average,optimized_average"
        );
        assert_eq!(lines[1], "0,X,10,60,true,true,2,0.00,71.00,95.00");
        assert_eq!(lines[2], "1,Y,10,95,true,false,,0.00,71.00,95.00");
        assert_eq!(lines[3], "2,Z,10,58,true,true,1,0.00,71.00,95.00");
    }

    #[test]
    fn every_row_has_the_header_width() {
        let items = vec![
            GradedItem::new("X", 10.0, 60.0),
            GradedItem::new("Y", 10.0, 95.0),
            GradedItem::new("Z", 10.0, 58.0),
        ];
        let csv = report_to_csv(&report(), &items, 1).expect("csv failed");
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let width = reader.headers().expect("missing header").len();
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("ragged csv");
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == width));
        assert_eq!(&rows[0][9], "95.0");
    }
}
