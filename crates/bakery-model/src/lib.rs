//! Shared vocabulary for the bakery ETL pipeline.
//!
//! Source table kinds and their column names, per-column semantic types,
//! validation issues, the star-schema row types, and the options that drive
//! a pipeline run.

pub mod dimensional;
pub mod issue;
pub mod lookup;
pub mod options;
pub mod source;

pub use dimensional::{
    BridgeProductIngredient, DimDate, DimIngredient, DimProduct, DimensionalModel, FactOrder,
    StagedRow, SurrogateKey,
};
pub use issue::{RuleCategory, RuleId, ValidationIssue};
pub use lookup::CaseInsensitiveLookup;
pub use options::{
    DEFAULT_COST_TOLERANCE, DEFAULT_REPORT_FILE, DEFAULT_STAGING_DIR, JoinPolicy,
    PipelineOptions, ValidationSettings, default_categories,
};
pub use source::{ColumnType, SourceKind, columns};
