//! Identifier columns must be populated on every row.

use bakery_model::{RuleId, ValidationIssue, columns};

use super::{Source, Sources, row_label};

pub(super) fn check(sources: &Sources<'_>) -> Vec<ValidationIssue> {
    let checks = [
        (sources.orders, RuleId::OrderIdPresent, columns::ORDER_ID),
        (sources.products, RuleId::ProductSkuPresent, columns::PRODUCT_SKU),
        (
            sources.ingredients,
            RuleId::IngredientNamePresent,
            columns::INGREDIENT,
        ),
    ];
    checks
        .into_iter()
        .filter_map(|(source, rule, column)| null_check(source?, rule, column))
        .collect()
}

fn null_check(
    source: Source<'_>,
    rule: RuleId,
    column: &'static [&'static str],
) -> Option<ValidationIssue> {
    let values = source.text(column)?;
    let null_rows: Vec<String> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_none())
        .map(|(idx, _)| row_label(idx))
        .collect();
    if null_rows.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::new(
            rule,
            source.kind,
            format!("Null {} detected", source.qualified(column)),
        )
        .with_offending(null_rows),
    )
}
