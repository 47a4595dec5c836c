//! Required column presence and numeric column contents.

use bakery_ingest::{parse_calendar_date, parse_f64};
use bakery_model::{RuleId, ValidationIssue, columns};

use super::{NULL_MARKER, Source, Sources, distinct};

pub(super) fn check(sources: &Sources<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for source in sources.present() {
        issues.extend(missing_columns(source));
        issues.extend(non_numeric_columns(source));
    }
    if let Some(orders) = sources.orders {
        issues.extend(unparseable_dates(orders));
    }
    issues
}

fn missing_columns(source: Source<'_>) -> Vec<ValidationIssue> {
    source
        .kind
        .required_columns()
        .iter()
        .filter(|aliases| !source.has(aliases))
        .map(|aliases| {
            let canonical = aliases.first().copied().unwrap_or_default();
            ValidationIssue::new(
                RuleId::MissingColumn,
                source.kind,
                format!(
                    "{} is missing required column {}",
                    source.kind.label(),
                    canonical
                ),
            )
        })
        .collect()
}

fn non_numeric_columns(source: Source<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for aliases in source.kind.numeric_columns() {
        let Some(name) = source.table.resolve_column(aliases) else {
            continue;
        };
        if source
            .table
            .column_type(name)
            .is_some_and(|column_type| column_type.is_numeric())
        {
            continue;
        }
        let Some(values) = source.text(aliases) else {
            continue;
        };
        // Blank cells are nulls, not type errors.
        let bad = distinct(
            values
                .into_iter()
                .flatten()
                .filter(|value| parse_f64(value).is_none()),
        );
        if !bad.is_empty() {
            issues.push(
                ValidationIssue::new(
                    RuleId::NonNumericValue,
                    source.kind,
                    format!("{} holds non-numeric values", source.qualified(aliases)),
                )
                .with_offending(bad),
            );
        }
    }
    issues
}

/// Every order needs a calendar date to land in dim_date.
fn unparseable_dates(orders: Source<'_>) -> Option<ValidationIssue> {
    let dates = orders.text(columns::ORDER_DATE)?;
    let bad = distinct(dates.into_iter().filter_map(|value| match value {
        Some(value) if parse_calendar_date(&value).is_some() => None,
        Some(value) => Some(value),
        None => Some(NULL_MARKER.to_string()),
    }));
    if bad.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::new(
            RuleId::UnparseableDate,
            orders.kind,
            format!(
                "{} holds values that are not dates",
                orders.qualified(columns::ORDER_DATE)
            ),
        )
        .with_offending(bad),
    )
}
