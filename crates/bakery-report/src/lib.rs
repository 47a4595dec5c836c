//! Reporting for the bakery ETL pipeline.
//!
//! - **Inspection**: per-table profile (types, sample rows, statistics,
//!   missing values, duplicates)
//! - **Text report**: inspection sections plus the validation summary
//! - **Issue JSON**: the validation issues for tooling
//! - **Staging**: the dimensional model as CSV files

mod error;
mod inspect;
mod json;
mod staging;
mod writer;

use std::fs;
use std::path::Path;

pub use error::{ReportError, Result};
pub use inspect::{
    MISSING_SENTINEL, MissingCount, NumericSummary, SAMPLE_ROWS, TableInspection, inspect_table,
    inspect_tables,
};
pub use json::{IssueReport, write_issues_json};
pub use staging::{StagedTable, staged_path, write_staging_outputs, write_table};
pub use writer::{ALL_CHECKS_PASSED, NO_MISSING_VALUES, ReportWriter, write_report_file};

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
