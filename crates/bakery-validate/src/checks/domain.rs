//! Value range and allowed-category rules.

use bakery_model::{RuleId, ValidationIssue, ValidationSettings, columns};

use super::{NULL_MARKER, Source, Sources, distinct};

/// A numeric column whose set values must satisfy `accepts`.
struct RangeRule {
    rule: RuleId,
    column: &'static [&'static str],
    /// Columns naming the offending row.
    key: &'static [&'static [&'static str]],
    accepts: fn(f64) -> bool,
    /// Violated condition as printed, e.g. `<= 0`.
    violation: &'static str,
    subject: &'static str,
}

impl RangeRule {
    fn check(&self, source: Source<'_>) -> Option<ValidationIssue> {
        let values = source.numbers(self.column)?;
        let keys = source.row_keys(self.key);
        // Null is never out of range.
        let offending = distinct(
            values
                .iter()
                .zip(keys)
                .filter(|(value, _)| value.is_some_and(|v| !(self.accepts)(v)))
                .map(|(_, key)| key),
        );
        if offending.is_empty() {
            return None;
        }
        Some(
            ValidationIssue::new(
                self.rule,
                source.kind,
                format!(
                    "{} {} for {}",
                    source.qualified(self.column),
                    self.violation,
                    self.subject
                ),
            )
            .with_offending(offending),
        )
    }
}

fn positive(value: f64) -> bool {
    value > 0.0
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}

const ORDER_RULES: &[RangeRule] = &[
    RangeRule {
        rule: RuleId::OrderQuantityPositive,
        column: columns::QUANTITY,
        key: &[columns::ORDER_ID],
        accepts: positive,
        violation: "<= 0",
        subject: "order_id(s)",
    },
    RangeRule {
        rule: RuleId::OrderTotalNonNegative,
        column: columns::TOTAL_PRICE,
        key: &[columns::ORDER_ID],
        accepts: non_negative,
        violation: "< 0",
        subject: "order_id(s)",
    },
];

const RECIPE_RULES: &[RangeRule] = &[RangeRule {
    rule: RuleId::RecipeQuantityPositive,
    column: columns::QUANTITY,
    key: &[columns::RECIPE_SKU, columns::INGREDIENT],
    accepts: positive,
    violation: "<= 0",
    subject: "recipe line(s)",
}];

const PRODUCT_RULES: &[RangeRule] = &[RangeRule {
    rule: RuleId::ProductPriceNonNegative,
    column: columns::PRICE,
    key: &[columns::PRODUCT_SKU],
    accepts: non_negative,
    violation: "< 0",
    subject: "sku(s)",
}];

const INGREDIENT_RULES: &[RangeRule] = &[
    RangeRule {
        rule: RuleId::IngredientCostPerUnitNonNegative,
        column: columns::COST_PER_UNIT,
        key: &[columns::INGREDIENT],
        accepts: non_negative,
        violation: "< 0",
        subject: "ingredient(s)",
    },
    RangeRule {
        rule: RuleId::IngredientCostPerGramNonNegative,
        column: columns::COST_PER_GRAM,
        key: &[columns::INGREDIENT],
        accepts: non_negative,
        violation: "< 0",
        subject: "ingredient(s)",
    },
];

pub(super) fn check(sources: &Sources<'_>, settings: &ValidationSettings) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let groups = [
        (sources.orders, ORDER_RULES),
        (sources.recipes, RECIPE_RULES),
        (sources.products, PRODUCT_RULES),
    ];
    for (source, rules) in groups {
        let Some(source) = source else {
            continue;
        };
        issues.extend(rules.iter().filter_map(|rule| rule.check(source)));
    }

    if let Some(products) = sources.products {
        issues.extend(category_check(products, settings));
    }

    if let Some(ingredients) = sources.ingredients {
        issues.extend(
            INGREDIENT_RULES
                .iter()
                .filter_map(|rule| rule.check(ingredients)),
        );
    }

    issues
}

fn category_check(products: Source<'_>, settings: &ValidationSettings) -> Option<ValidationIssue> {
    let categories = products.text(columns::CATEGORY)?;
    // An empty category is outside every allowed set.
    let invalid = distinct(categories.into_iter().filter_map(|category| match category {
        Some(category) if settings.allowed_categories.contains(&category) => None,
        Some(category) => Some(category),
        None => Some(NULL_MARKER.to_string()),
    }));
    if invalid.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::new(
            RuleId::ProductCategoryAllowed,
            products.kind,
            format!("Invalid {} values", products.qualified(columns::CATEGORY)),
        )
        .with_offending(invalid),
    )
}
