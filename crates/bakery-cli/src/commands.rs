use anyhow::{Context, Result};

use bakery_model::{JoinPolicy, PipelineOptions};

use bakery_cli::config::BakeryConfig;
use bakery_cli::pipeline::{InspectionOutcome, PipelineOutcome, inspect_sources, run_pipeline};

use crate::cli::{InspectArgs, RunArgs};

pub fn run_etl(args: &RunArgs) -> Result<PipelineOutcome> {
    let options = run_options(args)?;
    // main maps PipelineError::DataQuality to exit code 2.
    Ok(run_pipeline(&options)?)
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectionOutcome> {
    let config = BakeryConfig::discover(args.config.as_deref()).context("load config")?;
    let mut options = config.apply(PipelineOptions::new(&args.source_dir));
    if let Some(path) = &args.report {
        options = options.with_report_path(path.clone());
    }
    if args.issues_json.is_some() {
        options = options.with_issues_json(args.issues_json.clone());
    }
    Ok(inspect_sources(&options)?)
}

/// Defaults, then the config file, then flags.
fn run_options(args: &RunArgs) -> Result<PipelineOptions> {
    let config = BakeryConfig::discover(args.config.as_deref()).context("load config")?;
    let mut options = config.apply(PipelineOptions::new(&args.source_dir));
    if let Some(dir) = &args.staging_dir {
        options = options.with_staging_dir(dir.clone());
    }
    if let Some(path) = &args.report {
        options = options.with_report_path(path.clone());
    }
    if args.no_fail_on_issues {
        options = options.with_fail_on_issues(false);
    }
    if args.strict_joins {
        options = options.with_join_policy(JoinPolicy::Fail);
    }
    if args.issues_json.is_some() {
        options = options.with_issues_json(args.issues_json.clone());
    }
    Ok(options)
}
