//! Error types for table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading source tables.
///
/// `Decode` and `CsvParse` are the two parse failures: the bytes could not be
/// turned into text, or the text could not be read as a delimited table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parse Errors ===
    /// Bytes are malformed under the detected encoding.
    #[error("failed to decode {path} as {encoding}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    /// Failed to parse delimited text with Polars.
    #[error("failed to parse table {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// File holds no header row.
    #[error("table file is empty: {path}")]
    EmptyCsv { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Decode {
            path: PathBuf::from("/data/orders.csv"),
            encoding: "UTF-16LE",
        };
        assert_eq!(err.to_string(), "failed to decode /data/orders.csv as UTF-16LE");
    }
}
