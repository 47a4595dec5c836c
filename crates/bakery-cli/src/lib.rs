//! Pipeline controller and CLI support for the bakery ETL.

pub mod config;
pub mod logging;
pub mod pipeline;

pub use config::{BakeryConfig, ConfigError, DEFAULT_CONFIG_FILE};
pub use pipeline::{
    InspectionOutcome, PipelineError, PipelineOutcome, inspect_sources, run_pipeline,
};
