//! CLI argument definitions for the bakery ETL.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bakery",
    version,
    about = "Bakery ETL - inspect, validate, and model bakery sales data",
    long_about = "Load the bakery's product, ingredient, recipe, and order exports, \
                  write a consolidated inspection report, validate the data, and \
                  stage a star schema as CSV files.\n\n\
                  The transform runs only when validation passes, unless \
                  --no-fail-on-issues is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the staged star schema.
    Run(RunArgs),

    /// Write the inspection report and validation summary only.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding the source CSV/TSV exports.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Output directory for staged tables (default: <SOURCE_DIR>/../staging-data).
    #[arg(long = "staging-dir", value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Report path (default: <SOURCE_DIR>/consolidated_inspection_report.txt).
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Continue to the transform even when validation reports issues.
    ///
    /// Outputs written with this flag may contain rows that were dropped or
    /// costed incompletely.
    #[arg(long = "no-fail-on-issues")]
    pub no_fail_on_issues: bool,

    /// Fail the transform when an order does not resolve to a product or date
    /// instead of dropping it.
    #[arg(long = "strict-joins")]
    pub strict_joins: bool,

    /// Also write the validation issues as JSON.
    #[arg(long = "issues-json", value_name = "PATH")]
    pub issues_json: Option<PathBuf>,

    /// Config file (default: ./bakery.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Directory holding the source CSV/TSV exports.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Report path (default: <SOURCE_DIR>/consolidated_inspection_report.txt).
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Also write the validation issues as JSON.
    #[arg(long = "issues-json", value_name = "PATH")]
    pub issues_json: Option<PathBuf>,

    /// Config file (default: ./bakery.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "bakery",
            "run",
            "source-data",
            "--no-fail-on-issues",
            "--strict-joins",
            "--issues-json",
            "issues.json",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.source_dir, PathBuf::from("source-data"));
        assert!(args.no_fail_on_issues);
        assert!(args.strict_joins);
        assert_eq!(args.issues_json, Some(PathBuf::from("issues.json")));
        assert_eq!(args.staging_dir, None);
    }
}
