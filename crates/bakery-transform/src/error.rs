use thiserror::Error;

use bakery_model::SourceKind;

/// Errors raised while building the dimensional model.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("source table {0} is missing")]
    MissingTable(SourceKind),

    #[error("{table} is missing required column {column}")]
    MissingColumn {
        table: SourceKind,
        column: &'static str,
    },

    #[error("order date {value:?} on row {row} is not a recognised date")]
    InvalidDate { row: usize, value: String },

    #[error("{table} has more rows than surrogate keys can number")]
    KeySpaceExhausted { table: &'static str },

    /// Raised only under the `fail` join policy.
    #[error("{count} order(s) did not resolve a product or date: {}", order_ids.join(", "))]
    UnresolvedJoin { count: usize, order_ids: Vec<String> },
}

pub type Result<T> = std::result::Result<T, TransformError>;
