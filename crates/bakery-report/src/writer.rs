//! Consolidated text report.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Table};

use bakery_ingest::format_numeric;
use bakery_model::ValidationIssue;

use crate::error::{ReportError, Result};
use crate::inspect::{NumericSummary, TableInspection};

const SECTION_RULE_WIDTH: usize = 60;

pub const NO_MISSING_VALUES: &str = "No missing or invalid values detected.";
pub const ALL_CHECKS_PASSED: &str = "All validation checks passed.";

/// Renders inspection sections and the validation summary to any sink.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes every inspection followed by the validation summary.
    pub fn write_report(
        &mut self,
        inspections: &[TableInspection],
        issues: &[ValidationIssue],
    ) -> io::Result<()> {
        for inspection in inspections {
            self.write_inspection(inspection)?;
        }
        self.write_validation_summary(issues)?;
        self.out.flush()
    }

    pub fn write_inspection(&mut self, inspection: &TableInspection) -> io::Result<()> {
        writeln!(self.out, "INSPECTING FILE: {}", inspection.file_name)?;
        writeln!(self.out, "{}", "-".repeat(SECTION_RULE_WIDTH))?;
        writeln!(self.out, "Encoding: {}", inspection.encoding)?;
        writeln!(self.out, "Delimiter: {}", inspection.delimiter)?;
        writeln!(self.out, "Rows: {}", inspection.row_count)?;
        writeln!(self.out)?;

        writeln!(self.out, "Column Types:")?;
        writeln!(self.out, "{}", column_type_table(inspection))?;
        writeln!(self.out)?;

        writeln!(self.out, "First Rows:")?;
        writeln!(self.out, "{}", sample_table(&inspection.sample))?;
        writeln!(self.out)?;

        writeln!(self.out, "Summary Statistics:")?;
        if inspection.numeric_summary.is_empty() {
            writeln!(self.out, "No numeric columns.")?;
        } else {
            writeln!(self.out, "{}", statistics_table(&inspection.numeric_summary))?;
        }
        writeln!(self.out)?;

        writeln!(self.out, "Missing or Invalid Values:")?;
        if inspection.has_missing() {
            writeln!(self.out, "{}", missing_table(inspection))?;
        } else {
            writeln!(self.out, "{NO_MISSING_VALUES}")?;
        }
        writeln!(self.out)?;

        writeln!(self.out, "Duplicate Rows: {}", inspection.duplicate_rows)?;
        writeln!(self.out)
    }

    pub fn write_validation_summary(&mut self, issues: &[ValidationIssue]) -> io::Result<()> {
        writeln!(self.out, "VALIDATION SUMMARY")?;
        writeln!(self.out, "{}", "=".repeat(SECTION_RULE_WIDTH))?;
        if issues.is_empty() {
            return writeln!(self.out, "{ALL_CHECKS_PASSED}");
        }
        for (idx, issue) in issues.iter().enumerate() {
            writeln!(self.out, "{}. {}", idx + 1, issue)?;
        }
        Ok(())
    }
}

/// Writes the full report to `path`, creating parent directories.
pub fn write_report_file(
    path: &Path,
    inspections: &[TableInspection],
    issues: &[ValidationIssue],
) -> Result<()> {
    crate::ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    ReportWriter::new(BufWriter::new(file))
        .write_report(inspections, issues)
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
}

fn apply_report_table_style(table: &mut Table) {
    table.load_preset(ASCII_FULL_CONDENSED);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn column_type_table(inspection: &TableInspection) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Type")]);
    apply_report_table_style(&mut table);
    for column in &inspection.columns {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(column.column_type.as_str()),
        ]);
    }
    table
}

fn sample_table(sample: &[Vec<String>]) -> Table {
    let mut table = Table::new();
    apply_report_table_style(&mut table);
    let Some((header, rows)) = sample.split_first() else {
        return table;
    };
    table.set_header(header.iter().map(|name| header_cell(name)));
    for row in rows {
        table.add_row(row);
    }
    table
}

fn statistics_table(summaries: &[NumericSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(
        ["Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"].map(header_cell),
    );
    apply_report_table_style(&mut table);
    for idx in 1..9 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for summary in summaries {
        table.add_row(vec![
            Cell::new(&summary.column),
            Cell::new(summary.count),
            stat_cell(summary.mean),
            stat_cell(summary.std),
            stat_cell(summary.min),
            stat_cell(summary.q25),
            stat_cell(summary.median),
            stat_cell(summary.q75),
            stat_cell(summary.max),
        ]);
    }
    table
}

fn stat_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) if value.fract() == 0.0 => Cell::new(format_numeric(value)),
        Some(value) => Cell::new(format!("{value:.6}")),
        None => Cell::new("-"),
    }
}

fn missing_table(inspection: &TableInspection) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Missing or Invalid")]);
    apply_report_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for missing in &inspection.missing {
        table.add_row(vec![Cell::new(&missing.column), Cell::new(missing.count)]);
    }
    table
}
