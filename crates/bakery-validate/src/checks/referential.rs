//! Foreign key resolution across source tables.

use std::collections::HashSet;

use bakery_model::{RuleId, ValidationIssue, columns};

use super::{NULL_MARKER, Source, Sources, distinct};

/// One child column that must resolve against a parent column.
struct Reference<'a> {
    rule: RuleId,
    child: Source<'a>,
    child_column: &'static [&'static str],
    parent: Source<'a>,
    parent_column: &'static [&'static str],
    /// Blank child cells are reported instead of skipped.
    null_is_unresolved: bool,
}

impl Reference<'_> {
    fn check(&self) -> Option<ValidationIssue> {
        let children = self.child.text(self.child_column)?;
        let parents: HashSet<String> = self
            .parent
            .text(self.parent_column)?
            .into_iter()
            .flatten()
            .collect();

        let unresolved = distinct(children.into_iter().filter_map(|value| match value {
            Some(value) if parents.contains(&value) => None,
            Some(value) => Some(value),
            None if self.null_is_unresolved => Some(NULL_MARKER.to_string()),
            None => None,
        }));
        if unresolved.is_empty() {
            return None;
        }

        Some(
            ValidationIssue::new(
                self.rule,
                self.child.kind,
                format!(
                    "{} not found in {}",
                    self.child.qualified(self.child_column),
                    self.parent.qualified(self.parent_column)
                ),
            )
            .with_offending(unresolved),
        )
    }
}

pub(super) fn check(sources: &Sources<'_>) -> Vec<ValidationIssue> {
    let mut references = Vec::new();

    if let (Some(orders), Some(products)) = (sources.orders, sources.products) {
        references.push(Reference {
            rule: RuleId::OrderSkuReference,
            child: orders,
            child_column: columns::ORDER_SKU,
            parent: products,
            parent_column: columns::PRODUCT_SKU,
            null_is_unresolved: true,
        });
        references.push(Reference {
            rule: RuleId::OrderAddOnReference,
            child: orders,
            child_column: columns::ADD_ON_SKU,
            parent: products,
            parent_column: columns::PRODUCT_SKU,
            null_is_unresolved: false,
        });
    }

    if let (Some(recipes), Some(products)) = (sources.recipes, sources.products) {
        references.push(Reference {
            rule: RuleId::RecipeSkuReference,
            child: recipes,
            child_column: columns::RECIPE_SKU,
            parent: products,
            parent_column: columns::PRODUCT_SKU,
            null_is_unresolved: true,
        });
    }

    if let (Some(recipes), Some(ingredients)) = (sources.recipes, sources.ingredients) {
        references.push(Reference {
            rule: RuleId::RecipeIngredientReference,
            child: recipes,
            child_column: columns::INGREDIENT,
            parent: ingredients,
            parent_column: columns::INGREDIENT,
            null_is_unresolved: true,
        });
        // Units actually used by ingredients, not a fixed unit list.
        references.push(Reference {
            rule: RuleId::RecipeUnitReference,
            child: recipes,
            child_column: columns::QUANTITY_UNIT,
            parent: ingredients,
            parent_column: columns::UNIT,
            null_is_unresolved: true,
        });
    }

    references
        .iter()
        .filter_map(Reference::check)
        .collect()
}
