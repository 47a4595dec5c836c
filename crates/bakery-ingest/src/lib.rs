//! Table loading for the bakery ETL pipeline.
//!
//! Discovers delimited files in a source directory, sniffs each file's
//! encoding and delimiter, and parses it into a Polars frame whose columns
//! carry a semantic [`bakery_model::ColumnType`].

pub mod dates;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod polars_utils;
pub mod table;

pub use dates::{date_key, parse_calendar_date};
pub use discovery::{TABLE_EXTENSIONS, list_table_files, table_name};
pub use encoding::{
    DELIMITER_SAMPLE_CHARS, ENCODING_SAMPLE_BYTES, EncodingGuess, decode, delimiter_label,
    detect_delimiter, sniff_encoding,
};
pub use error::{IngestError, Result};
pub use polars_utils::{any_to_f64, any_to_string, any_to_string_non_empty, format_numeric, parse_f64};
pub use table::{ColumnSchema, SourceTable, TableSet, load_table, load_tables, parse_table};
