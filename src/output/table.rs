use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::output::format_average;
use crate::planner::{CrossCheck, OptimizationReport};
use crate::types::GradedItem;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_averages_table(report: &OptimizationReport, decimals: usize) -> String {
    let mut table = new_table();
    table.set_header(vec!["Average", "Value"]);
    table.add_row(vec![
        "Before this semester".to_string(),
        format_average(report.pre_semester_average, decimals),
    ]);
    table.add_row(vec![
        "All graded this semester".to_string(),
        format_average(report.all_graded_average, decimals),
    ]);

    let optimized = Cell::new(format_average(report.optimized_average, decimals));
    let optimized = if report.improvement() > 0.0 {
        optimized.fg(Color::Green)
    } else {
        optimized
    };
    table.add_row(Row::from(vec![
        Cell::new("After optimal Binary Pass"),
        optimized,
    ]));

    let mut out = table.to_string();
    if report.chosen_identifiers.is_empty() {
        out.push_str("\nNo courses were changed to Pass/Fail.");
    } else {
        out.push_str(&format!(
            "\nCourses changed to Pass/Fail: {}",
            report.chosen_identifiers.join(", ")
        ));
    }
    out
}

pub fn render_items_table(report: &OptimizationReport, items: &[GradedItem]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "#",
        "Course",
        "Credits",
        "Grade",
        "Eligible",
        "Pass/Fail",
    ]);
    for (idx, item) in items.iter().enumerate() {
        let eligible = report.eligible_indices.contains(&idx);
        let eligible_cell = if eligible {
            Cell::new("YES").fg(Color::Green)
        } else {
            Cell::new("NO").fg(Color::Red)
        };
        let converted = match report.chosen_indices.iter().position(|&c| c == idx) {
            Some(pos) => Cell::new(format!("PASS ({})", pos + 1)).fg(Color::Green),
            None => Cell::new("-"),
        };
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            Cell::new(&item.identifier),
            Cell::new(item.credit_weight),
            Cell::new(item.grade),
            eligible_cell,
            converted,
        ]));
    }
    table.to_string()
}

pub fn render_eligible_table(items: &[GradedItem], eligible: &[usize], pass_limit: usize) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Course", "Credits", "Grade"]);
    for &idx in eligible {
        let item = &items[idx];
        table.add_row(vec![
            (idx + 1).to_string(),
            item.identifier.clone(),
            item.credit_weight.to_string(),
            item.grade.to_string(),
        ]);
    }
    format!(
        "{table}\n{} eligible, up to {pass_limit} may be converted",
        eligible.len()
    )
}

pub fn render_cross_check_table(check: &CrossCheck, items: &[GradedItem], decimals: usize) -> String {
    let mut table = new_table();
    table.set_header(vec!["Search", "Average", "Converted"]);
    for (search, selection) in [("greedy", &check.greedy), ("exhaustive", &check.exhaustive)] {
        let names = selection
            .indices
            .iter()
            .map(|&idx| items[idx].identifier.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            search.to_string(),
            format_average(selection.average, decimals),
            names,
        ]);
    }
    let verdict = if check.agrees { "AGREE" } else { "DISAGREE" };
    format!(
        "{table}\n{} candidates, limit {}: {verdict}",
        check.candidate_count, check.pass_limit
    )
}
