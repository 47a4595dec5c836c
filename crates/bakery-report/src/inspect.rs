//! Descriptive profile of one loaded table.
//!
//! Inspection never fails and never touches the frame it reads. Column types
//! come from the tags decided at load time.

use std::collections::HashSet;
use std::time::Instant;

use polars::prelude::*;
use tracing::{debug, info, info_span};

use bakery_ingest::{ColumnSchema, SourceTable, TableSet, any_to_f64, any_to_string};
use bakery_model::ColumnType;

/// Rows shown verbatim per table.
pub const SAMPLE_ROWS: usize = 5;

/// Sentinel some exports write for "no value".
pub const MISSING_SENTINEL: &str = "-";

/// `count, mean, std, min, 25%, 50%, 75%, max` for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; empty below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Cells per column that are null, the `-` sentinel, or numeric zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCount {
    pub column: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableInspection {
    /// File name as found on disk.
    pub file_name: String,
    pub encoding: String,
    pub delimiter: &'static str,
    pub row_count: usize,
    pub columns: Vec<ColumnSchema>,
    /// Header row followed by up to [`SAMPLE_ROWS`] rows, as text.
    pub sample: Vec<Vec<String>>,
    pub numeric_summary: Vec<NumericSummary>,
    /// Only columns with at least one missing or invalid cell.
    pub missing: Vec<MissingCount>,
    pub duplicate_rows: usize,
}

impl TableInspection {
    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Inspects every table in name order.
pub fn inspect_tables(tables: &TableSet) -> Vec<TableInspection> {
    let span = info_span!("inspect");
    let _guard = span.enter();
    let start = Instant::now();

    let inspections: Vec<TableInspection> = tables.iter().map(inspect_table).collect();
    for inspection in &inspections {
        debug!(
            table = %inspection.file_name,
            rows = inspection.row_count,
            duplicate_rows = inspection.duplicate_rows,
            columns_with_missing = inspection.missing.len(),
            "inspected table"
        );
    }

    info!(
        tables = inspections.len(),
        duration_ms = start.elapsed().as_millis(),
        "inspect complete"
    );
    inspections
}

pub fn inspect_table(table: &SourceTable) -> TableInspection {
    let file_name = table
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| table.name.clone());

    let mut numeric_summary = Vec::new();
    let mut missing = Vec::new();
    for schema in &table.columns {
        let Ok(column) = table.data.column(&schema.name) else {
            continue;
        };
        if schema.column_type.is_numeric() {
            numeric_summary.push(summarize(&schema.name, &numeric_cells(column)));
        }
        let count = count_missing(column, schema.column_type);
        if count > 0 {
            missing.push(MissingCount {
                column: schema.name.clone(),
                count,
            });
        }
    }

    TableInspection {
        file_name,
        encoding: table.encoding.clone(),
        delimiter: table.delimiter_label(),
        row_count: table.row_count(),
        columns: table.columns.clone(),
        sample: sample_rows(&table.data),
        numeric_summary,
        missing,
        duplicate_rows: count_duplicate_rows(&table.data),
    }
}

fn cell(column: &Column, idx: usize) -> AnyValue<'_> {
    column.get(idx).unwrap_or(AnyValue::Null)
}

fn numeric_cells(column: &Column) -> Vec<f64> {
    (0..column.len())
        .filter_map(|idx| any_to_f64(cell(column, idx)))
        .collect()
}

fn sample_rows(data: &DataFrame) -> Vec<Vec<String>> {
    let columns = data.get_columns();
    let header = columns.iter().map(|c| c.name().to_string()).collect();
    let mut rows = vec![header];
    for idx in 0..data.height().min(SAMPLE_ROWS) {
        rows.push(
            columns
                .iter()
                .map(|column| any_to_string(cell(column, idx)))
                .collect(),
        );
    }
    rows
}

fn count_missing(column: &Column, column_type: ColumnType) -> usize {
    (0..column.len())
        .filter(|&idx| {
            let value = cell(column, idx);
            match value {
                AnyValue::Null => true,
                AnyValue::Boolean(flag) => !flag,
                _ if column_type.is_numeric() => any_to_f64(value) == Some(0.0),
                _ => any_to_string(value).trim() == MISSING_SENTINEL,
            }
        })
        .count()
}

/// Rows identical in every column to an earlier row.
fn count_duplicate_rows(data: &DataFrame) -> usize {
    let columns = data.get_columns();
    let mut seen = HashSet::new();
    (0..data.height())
        .filter(|&idx| {
            let row: Vec<Option<String>> = columns
                .iter()
                .map(|column| match cell(column, idx) {
                    AnyValue::Null => None,
                    value => Some(any_to_string(value)),
                })
                .collect();
            !seen.insert(row)
        })
        .count()
}

fn summarize(column: &str, values: &[f64]) -> NumericSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();

    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = mean.filter(|_| count > 1).map(|mean| {
        let sum_sq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    });

    NumericSummary {
        column: column.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear interpolation between closest ranks over sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use bakery_ingest::parse_table;

    use super::*;

    fn inspect(name: &str, content: &str) -> TableInspection {
        let path = Path::new("/data").join(format!("{name}.csv"));
        inspect_table(&parse_table(name, &path, content.as_bytes()).unwrap())
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.25), Some(1.75));
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
        assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn summary_matches_sample_statistics() {
        let summary = summarize("price", &[4.0, 2.0, 6.0]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, Some(4.0));
        assert_eq!(summary.std, Some(2.0));
        assert_eq!(summary.min, Some(2.0));
        assert_eq!(summary.median, Some(4.0));
        assert_eq!(summary.max, Some(6.0));
        assert_eq!(summarize("price", &[5.0]).std, None);
    }

    #[test]
    fn missing_counts_nulls_sentinels_and_zeros() {
        let inspection = inspect(
            "shopify_orders",
            "order_id,sku,quantity,note\n1001,CK-CHOC-001,1,-\n1002,,0,ok\n1003,CK-SUGR-001,2,\n",
        );
        assert_eq!(
            inspection.missing,
            vec![
                MissingCount {
                    column: "sku".to_string(),
                    count: 1
                },
                MissingCount {
                    column: "quantity".to_string(),
                    count: 1
                },
                MissingCount {
                    column: "note".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn clean_table_reports_nothing_missing() {
        let inspection = inspect("products", "sku,price\nCK-1,28\nCK-2,30\n");
        assert!(!inspection.has_missing());
        assert_eq!(inspection.file_name, "products.csv");
        assert_eq!(inspection.delimiter, "comma");
    }

    #[test]
    fn duplicates_count_repeats_only() {
        let inspection = inspect("recipes", "sku,ingredient\nA,flour\nA,flour\nB,sugar\nA,flour\n");
        assert_eq!(inspection.duplicate_rows, 2);
    }

    #[test]
    fn sample_keeps_header_and_first_rows() {
        let body: String = (1..=8).map(|i| format!("{i},row{i}\n")).collect();
        let inspection = inspect("orders", &format!("order_id,label\n{body}"));
        assert_eq!(inspection.sample.len(), SAMPLE_ROWS + 1);
        assert_eq!(inspection.sample[0], vec!["order_id", "label"]);
        assert_eq!(inspection.sample[5], vec!["5", "row5"]);
        assert_eq!(inspection.numeric_summary.len(), 1);
        assert_eq!(inspection.numeric_summary[0].column, "order_id");
    }
}
