use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bakery_cli::pipeline::{InspectionOutcome, PipelineOutcome};
use bakery_model::ValidationIssue;
use bakery_report::StagedTable;

pub fn print_run_summary(outcome: &PipelineOutcome) {
    print_report_paths(&outcome.inspection);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Path"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total_rows = 0usize;
    for staged in &outcome.staged {
        total_rows += staged.rows;
        table.add_row(output_row(staged));
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    println!("{table}");
    print_issues(outcome.issues());
}

pub fn print_inspection_summary(outcome: &InspectionOutcome) {
    print_report_paths(outcome);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Encoding"),
        header_cell("Delimiter"),
        header_cell("Duplicates"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for inspection in &outcome.inspections {
        table.add_row(vec![
            Cell::new(&inspection.file_name),
            Cell::new(inspection.row_count),
            Cell::new(&inspection.encoding),
            Cell::new(inspection.delimiter),
            count_cell(inspection.duplicate_rows, Color::Yellow),
        ]);
    }
    println!("{table}");
    print_issues(&outcome.issues);
}

pub fn print_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        println!("Validation: all checks passed");
        return;
    }
    println!("Validation: {} issue(s)", issues.len());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Rule"),
        header_cell("Category"),
        header_cell("Table"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, issue) in issues.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(issue.rule.code()).fg(Color::Red),
            Cell::new(issue.category.label()),
            Cell::new(issue.table.label()),
            Cell::new(issue.to_string()),
        ]);
    }
    println!("{table}");
}

fn print_report_paths(outcome: &InspectionOutcome) {
    println!("Report: {}", outcome.report_path.display());
    if let Some(path) = &outcome.issues_json {
        println!("Issues JSON: {}", path.display());
    }
}

fn output_row(staged: &StagedTable) -> Vec<Cell> {
    vec![
        Cell::new(staged.table),
        count_cell(staged.rows, Color::Green),
        path_cell(&staged.path),
    ]
}

fn path_cell(path: &Path) -> Cell {
    Cell::new(path.display()).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
