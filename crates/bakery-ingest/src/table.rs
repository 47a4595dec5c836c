//! Source tables loaded into Polars frames.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::*;
use tracing::{debug, info, info_span, warn};

use bakery_model::{CaseInsensitiveLookup, ColumnType, SourceKind};

use crate::dates::parse_calendar_date;
use crate::discovery::{list_table_files, table_name};
use crate::encoding::{decode, delimiter_label, detect_delimiter, sniff_encoding};
use crate::error::{IngestError, Result};
use crate::polars_utils::{any_to_f64, any_to_string_non_empty};

/// Column name with the semantic type decided at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// One delimited file, parsed.
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Normalized file stem.
    pub name: String,
    pub kind: Option<SourceKind>,
    pub path: PathBuf,
    /// Encoding label (`ascii`, `utf-8`, `windows-1252`, ...).
    pub encoding: String,
    pub delimiter: u8,
    pub data: DataFrame,
    /// Column schema in file order.
    pub columns: Vec<ColumnSchema>,
    lookup: CaseInsensitiveLookup,
}

impl SourceTable {
    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn delimiter_label(&self) -> &'static str {
        delimiter_label(self.delimiter)
    }

    /// Actual column name for the first alias present.
    pub fn resolve_column(&self, aliases: &[&str]) -> Option<&str> {
        self.lookup.resolve(aliases)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.column_type)
    }

    /// Trimmed text per row; blank cells are `None`.
    pub fn text_values(&self, aliases: &[&str]) -> Option<Vec<Option<String>>> {
        let name = self.resolve_column(aliases)?;
        let column = self.data.column(name).ok()?;
        let values = (0..self.data.height())
            .map(|idx| any_to_string_non_empty(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        Some(values)
    }

    /// Numeric value per row; null and unparseable cells are `None`.
    pub fn numeric_values(&self, aliases: &[&str]) -> Option<Vec<Option<f64>>> {
        let name = self.resolve_column(aliases)?;
        let column = self.data.column(name).ok()?;
        let values = (0..self.data.height())
            .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        Some(values)
    }
}

/// Loaded tables keyed by table name, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: BTreeMap<String, SourceTable>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: SourceTable) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&SourceTable> {
        self.tables.get(name)
    }

    /// First table (in name order) classified as `kind`.
    pub fn by_kind(&self, kind: SourceKind) -> Option<&SourceTable> {
        self.tables.values().find(|table| table.kind == Some(kind))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<SourceTable> for TableSet {
    fn from_iter<I: IntoIterator<Item = SourceTable>>(iter: I) -> Self {
        let mut set = Self::new();
        for table in iter {
            set.insert(table);
        }
        set
    }
}

/// Parses raw file bytes: sniff encoding, decode, detect the delimiter, then
/// read with Polars.
pub fn parse_table(name: &str, path: &Path, bytes: &[u8]) -> Result<SourceTable> {
    let guess = sniff_encoding(bytes);
    let text = decode(path, bytes, &guess)?;
    if text.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    let delimiter = detect_delimiter(&text);

    let data = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_separator(delimiter))
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let columns: Vec<ColumnSchema> = data
        .get_columns()
        .iter()
        .map(|column| ColumnSchema {
            name: column.name().to_string(),
            column_type: classify_column(column),
        })
        .collect();
    let lookup = CaseInsensitiveLookup::new(columns.iter().map(|column| column.name.as_str()));

    Ok(SourceTable {
        name: name.to_string(),
        kind: SourceKind::from_table_name(name),
        path: path.to_path_buf(),
        encoding: guess.label(),
        delimiter,
        data,
        columns,
        lookup,
    })
}

/// Reads and parses one file; the table name comes from the file stem.
pub fn load_table(path: &Path) -> Result<SourceTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_table(&table_name(path), path, &bytes)
}

/// Loads every table file in `dir`.
///
/// Any file that cannot be decoded or parsed aborts the load.
pub fn load_tables(dir: &Path) -> Result<TableSet> {
    let span = info_span!("ingest", dir = %dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let files = list_table_files(dir)?;
    let mut set = TableSet::new();
    for path in files {
        let table = load_table(&path)?;
        debug!(
            table = %table.name,
            rows = table.row_count(),
            columns = table.columns.len(),
            encoding = %table.encoding,
            delimiter = table.delimiter_label(),
            "loaded table"
        );
        if let Some(kind) = table.kind
            && let Some(existing) = set.by_kind(kind)
        {
            warn!(
                kind = %kind,
                kept = %existing.name,
                ignored = %table.name,
                "more than one table classified as the same source kind"
            );
        }
        if table.kind.is_none() {
            debug!(table = %table.name, "table not classified; inspected only");
        }
        set.insert(table);
    }

    info!(
        tables = set.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(set)
}

fn classify_column(column: &Column) -> ColumnType {
    let dtype = column.dtype();
    if dtype.is_integer() {
        ColumnType::Integer
    } else if dtype.is_float() {
        ColumnType::Float
    } else if matches!(dtype, DataType::Boolean) {
        ColumnType::Boolean
    } else if dtype.is_temporal() || holds_only_dates(column) {
        ColumnType::Date
    } else {
        ColumnType::Text
    }
}

/// True when at least one cell is set and every set cell parses as a date.
fn holds_only_dates(column: &Column) -> bool {
    let mut seen = false;
    for idx in 0..column.len() {
        let Some(value) = any_to_string_non_empty(column.get(idx).unwrap_or(AnyValue::Null))
        else {
            continue;
        };
        if parse_calendar_date(&value).is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, content: &str) -> SourceTable {
        parse_table(name, Path::new(name), content.as_bytes()).unwrap()
    }

    #[test]
    fn column_types_are_tagged_once() {
        let table = parse(
            "shopify_orders",
            "order_id,date,sku,quantity,add_on_sku,total_price,gift\n\
             1001,2024-03-01 10:00:00,CK-CHOC-001,1,ADD-NUTELLA,32.00,true\n\
             1002,2024-03-02 11:30:00,CK-SUGR-001,2,,56.00,false\n",
        );
        assert_eq!(table.kind, Some(SourceKind::Orders));
        assert_eq!(table.column_type("order_id"), Some(ColumnType::Integer));
        assert_eq!(table.column_type("date"), Some(ColumnType::Date));
        assert_eq!(table.column_type("sku"), Some(ColumnType::Text));
        assert_eq!(table.column_type("total_price"), Some(ColumnType::Float));
        assert_eq!(table.column_type("gift"), Some(ColumnType::Boolean));
    }

    #[test]
    fn empty_fields_load_as_null() {
        let table = parse(
            "shopify_orders",
            "order_id,sku,add_on_sku\n1001,CK-CHOC-001,ADD-NUTELLA\n1002,CK-SUGR-001,\n",
        );
        let add_ons = table.text_values(&["add_on_sku"]).unwrap();
        assert_eq!(add_ons, vec![Some("ADD-NUTELLA".to_string()), None]);
    }

    #[test]
    fn aliases_resolve_case_insensitively() {
        let table = parse(
            "shopify_products",
            "Cookie_SKU,Product_Name,category,price\nCK-CHOC-001,Chocolate Chip,Dozen Cookies,28.00\n",
        );
        assert_eq!(
            table.resolve_column(bakery_model::columns::PRODUCT_SKU),
            Some("Cookie_SKU")
        );
        assert_eq!(
            table.numeric_values(bakery_model::columns::PRICE).unwrap(),
            vec![Some(28.0)]
        );
        assert!(table.text_values(&["supplier"]).is_none());
    }

    #[test]
    fn tab_delimited_text() {
        let table = parse("recipes", "sku\tingredient\tquantity\nCK-CHOC-001\tflour\t2.5\n");
        assert_eq!(table.delimiter, b'\t');
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn blank_file_is_empty_csv() {
        let result = parse_table("x", Path::new("x.csv"), b"  \n");
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn table_set_finds_tables_by_kind() {
        let set: TableSet = [
            parse("recipes", "sku,ingredient\nA,flour\n"),
            parse("notes", "a\n1\n"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.by_kind(SourceKind::Recipes).map(|t| t.name.as_str()),
            Some("recipes")
        );
        assert!(set.by_kind(SourceKind::Orders).is_none());
    }
}
