//! Pipeline controller.
//!
//! Stages run strictly in order:
//! load -> inspect -> validate -> report -> gate -> transform -> outputs.
//! Nothing under the staging directory is touched unless the gate passes.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, info_span, warn};

use bakery_ingest::{IngestError, TableSet, load_tables};
use bakery_model::{PipelineOptions, ValidationIssue};
use bakery_report::{
    ReportError, StagedTable, TableInspection, inspect_tables, write_issues_json,
    write_report_file, write_staging_outputs,
};
use bakery_transform::{TransformError, transform_tables};
use bakery_validate::{GateDecision, gate_on_issues, validate_tables};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to load source tables")]
    Ingest(#[from] IngestError),

    #[error("failed to write the inspection report")]
    Report(#[source] ReportError),

    #[error(
        "data quality checks failed with {issue_count} issue(s); see {}",
        report.display()
    )]
    DataQuality {
        issue_count: usize,
        report: PathBuf,
        issues: Vec<ValidationIssue>,
    },

    #[error("dimensional transform failed")]
    Transform(#[from] TransformError),

    #[error("failed to write staged outputs")]
    Output(#[source] ReportError),
}

/// Result of the inspect and validate half of a run.
#[derive(Debug)]
pub struct InspectionOutcome {
    pub inspections: Vec<TableInspection>,
    pub issues: Vec<ValidationIssue>,
    pub report_path: PathBuf,
    pub issues_json: Option<PathBuf>,
}

/// Result of a run that got past the gate.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub inspection: InspectionOutcome,
    pub gate: GateDecision,
    pub staged: Vec<StagedTable>,
}

impl PipelineOutcome {
    /// Issues that were reported but did not block the run.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.inspection.issues
    }
}

/// Loads, inspects, and validates the source directory, then writes the
/// report. Never gates and never writes staged outputs.
pub fn inspect_sources(options: &PipelineOptions) -> Result<InspectionOutcome, PipelineError> {
    load_and_report(options).map(|(_, outcome)| outcome)
}

fn load_and_report(
    options: &PipelineOptions,
) -> Result<(TableSet, InspectionOutcome), PipelineError> {
    let tables = load_tables(&options.source_dir)?;
    let inspections = inspect_tables(&tables);
    let issues = validate_tables(&tables, &options.validation);

    write_report_file(&options.report_path, &inspections, &issues)
        .map_err(PipelineError::Report)?;
    info!(path = %options.report_path.display(), "wrote inspection report");

    if let Some(path) = &options.issues_json {
        write_issues_json(path, &issues).map_err(PipelineError::Report)?;
        info!(path = %path.display(), "wrote issue report");
    }

    let outcome = InspectionOutcome {
        inspections,
        issues,
        report_path: options.report_path.clone(),
        issues_json: options.issues_json.clone(),
    };
    Ok((tables, outcome))
}

/// Runs the full pipeline.
///
/// # Errors
///
/// [`PipelineError::DataQuality`] when validation reported issues and
/// `fail_on_issues` is set; the report has been written by then.
pub fn run_pipeline(options: &PipelineOptions) -> Result<PipelineOutcome, PipelineError> {
    let span = info_span!("pipeline", source = %options.source_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let (tables, inspection) = load_and_report(options)?;

    let gate = gate_on_issues(&inspection.issues, options.fail_on_issues);
    if gate.blocked {
        warn!(
            issue_count = gate.issue_count,
            "validation failed; skipping transform and outputs"
        );
        return Err(PipelineError::DataQuality {
            issue_count: gate.issue_count,
            report: inspection.report_path,
            issues: inspection.issues,
        });
    }
    if gate.issue_count > 0 {
        warn!(
            issue_count = gate.issue_count,
            "continuing past validation issues"
        );
    }

    let model = transform_tables(&tables, options.join_policy)?;
    let staged =
        write_staging_outputs(&options.staging_dir, &model).map_err(PipelineError::Output)?;

    info!(
        tables = staged.len(),
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineOutcome {
        inspection,
        gate,
        staged,
    })
}
