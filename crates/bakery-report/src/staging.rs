//! Staged CSV outputs of the dimensional model.
//!
//! Every table is first written to a `.tmp` sibling. Only once all five are
//! on disk are they renamed into place, so a failed write leaves the previous
//! run's files untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, info_span};

use bakery_model::{
    BridgeProductIngredient, DimDate, DimIngredient, DimProduct, DimensionalModel, FactOrder,
    StagedRow,
};

use crate::error::{ReportError, Result};

pub const STAGED_EXTENSION: &str = "csv";

/// One table written to the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTable {
    pub table: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// Path of `table` inside `staging_dir`.
pub fn staged_path(staging_dir: &Path, table: &str) -> PathBuf {
    staging_dir.join(format!("{table}.{STAGED_EXTENSION}"))
}

/// Writes all five tables in model order.
pub fn write_staging_outputs(
    staging_dir: &Path,
    model: &DimensionalModel,
) -> Result<Vec<StagedTable>> {
    let span = info_span!("output", dir = %staging_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    fs::create_dir_all(staging_dir).map_err(|source| ReportError::CreateDir {
        path: staging_dir.to_path_buf(),
        source,
    })?;

    let mut pending = Vec::with_capacity(5);
    if let Err(error) = stage_all(staging_dir, model, &mut pending) {
        for table in &pending {
            let _ = fs::remove_file(&table.tmp_path);
        }
        return Err(error);
    }
    let written = pending
        .into_iter()
        .map(PendingTable::commit)
        .collect::<Result<Vec<_>>>()?;

    info!(
        tables = written.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(written)
}

/// Writes one table and renames it into place: header from
/// [`StagedRow::COLUMNS`], then one record per row with empty fields for
/// `None`.
pub fn write_table<T: StagedRow>(staging_dir: &Path, rows: &[T]) -> Result<StagedTable> {
    stage_table(staging_dir, rows)?.commit()
}

/// A table written under its `.tmp` name.
struct PendingTable {
    staged: StagedTable,
    tmp_path: PathBuf,
}

impl PendingTable {
    fn commit(self) -> Result<StagedTable> {
        let Self { staged, tmp_path } = self;
        fs::rename(&tmp_path, &staged.path).map_err(|source| ReportError::Rename {
            from: tmp_path.clone(),
            to: staged.path.clone(),
            source,
        })?;
        debug!(
            table = staged.table,
            rows = staged.rows,
            path = %staged.path.display(),
            "wrote table"
        );
        Ok(staged)
    }
}

fn stage_all(
    staging_dir: &Path,
    model: &DimensionalModel,
    pending: &mut Vec<PendingTable>,
) -> Result<()> {
    pending.push(stage_table::<DimProduct>(staging_dir, &model.dim_product)?);
    pending.push(stage_table::<DimDate>(staging_dir, &model.dim_date)?);
    pending.push(stage_table::<DimIngredient>(staging_dir, &model.dim_ingredient)?);
    pending.push(stage_table::<BridgeProductIngredient>(staging_dir, &model.bridge)?);
    pending.push(stage_table::<FactOrder>(staging_dir, &model.fact_orders)?);
    Ok(())
}

fn stage_table<T: StagedRow>(staging_dir: &Path, rows: &[T]) -> Result<PendingTable> {
    let path = staged_path(staging_dir, T::TABLE);
    let tmp_path = path.with_extension(format!("{STAGED_EXTENSION}.tmp"));

    if let Err(error) = write_rows(&tmp_path, rows) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(PendingTable {
        staged: StagedTable {
            table: T::TABLE,
            path,
            rows: rows.len(),
        },
        tmp_path,
    })
}

fn write_rows<T: StagedRow>(path: &Path, rows: &[T]) -> Result<()> {
    let csv_error = |source| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;
    writer.write_record(T::COLUMNS).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
