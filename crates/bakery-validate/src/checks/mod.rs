//! Validation check modules.
//!
//! Each module covers one rule family.

mod completeness;
mod consistency;
mod domain;
mod referential;
mod structure;

use std::collections::HashSet;

use bakery_ingest::{SourceTable, TableSet};
use bakery_model::{SourceKind, ValidationIssue, ValidationSettings};

/// Marker used when a foreign key cell is empty.
pub(crate) const NULL_MARKER: &str = "<null>";

/// Run all validation checks.
pub(crate) fn run_all(tables: &TableSet, settings: &ValidationSettings) -> Vec<ValidationIssue> {
    let sources = Sources::from_tables(tables);
    let mut issues = Vec::new();

    // 1. Required columns present, numeric columns hold numbers
    issues.extend(structure::check(&sources));

    // 2. Foreign keys resolve
    issues.extend(referential::check(&sources));

    // 3. Value ranges and allowed categories
    issues.extend(domain::check(&sources, settings));

    // 4. Stored derivations agree with their inputs
    issues.extend(consistency::check(&sources, settings));

    // 5. Identifiers populated
    issues.extend(completeness::check(&sources));

    issues
}

/// A loaded table paired with the kind it was classified as.
#[derive(Clone, Copy)]
pub(crate) struct Source<'a> {
    pub kind: SourceKind,
    pub table: &'a SourceTable,
}

impl Source<'_> {
    pub fn has(&self, aliases: &[&str]) -> bool {
        self.table.resolve_column(aliases).is_some()
    }

    pub fn text(&self, aliases: &[&str]) -> Option<Vec<Option<String>>> {
        self.table.text_values(aliases)
    }

    pub fn numbers(&self, aliases: &[&str]) -> Option<Vec<Option<f64>>> {
        self.table.numeric_values(aliases)
    }

    /// `Table.column` using the column's spelling in the file.
    pub fn qualified(&self, aliases: &[&str]) -> String {
        let column = self
            .table
            .resolve_column(aliases)
            .or_else(|| aliases.first().copied())
            .unwrap_or_default();
        format!("{}.{}", self.kind.label(), column)
    }

    /// Per-row identifying key built from `key_columns` joined by `/`.
    ///
    /// Rows with any blank key part fall back to `row N` (1-based).
    pub fn row_keys(&self, key_columns: &[&[&str]]) -> Vec<String> {
        let columns: Vec<Vec<Option<String>>> = key_columns
            .iter()
            .filter_map(|aliases| self.text(aliases))
            .collect();
        (0..self.table.row_count())
            .map(|idx| {
                let parts: Option<Vec<String>> =
                    columns.iter().map(|column| column[idx].clone()).collect();
                match parts {
                    Some(parts) if !parts.is_empty() => parts.join("/"),
                    _ => row_label(idx),
                }
            })
            .collect()
    }
}

pub(crate) fn row_label(idx: usize) -> String {
    format!("row {}", idx + 1)
}

/// The four source tables, each optional.
pub(crate) struct Sources<'a> {
    pub products: Option<Source<'a>>,
    pub ingredients: Option<Source<'a>>,
    pub recipes: Option<Source<'a>>,
    pub orders: Option<Source<'a>>,
}

impl<'a> Sources<'a> {
    pub fn from_tables(tables: &'a TableSet) -> Self {
        let source = |kind| tables.by_kind(kind).map(|table| Source { kind, table });
        Self {
            products: source(SourceKind::Products),
            ingredients: source(SourceKind::Ingredients),
            recipes: source(SourceKind::Recipes),
            orders: source(SourceKind::Orders),
        }
    }

    pub fn present(&self) -> impl Iterator<Item = Source<'a>> {
        [self.products, self.ingredients, self.recipes, self.orders]
            .into_iter()
            .flatten()
    }
}

/// Keeps the first occurrence of each value.
pub(crate) fn distinct<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_first_seen_order() {
        let values = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(distinct(values), vec!["b", "a", "c"]);
    }
}
