//! Stored ingredient derivations checked against their inputs.

use bakery_model::{RuleId, ValidationIssue, ValidationSettings, columns};

use super::{Source, Sources, distinct};

pub(super) fn check(sources: &Sources<'_>, settings: &ValidationSettings) -> Vec<ValidationIssue> {
    let Some(ingredients) = sources.ingredients else {
        return Vec::new();
    };
    [
        cost_per_gram_check(ingredients, settings.cost_tolerance),
        container_check(ingredients),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// `|cost_per_unit / grams_per_unit - cost_per_gram|` must stay within
/// `tolerance`. A zero `grams_per_unit` cannot yield a finite cost and is
/// flagged.
fn cost_per_gram_check(ingredients: Source<'_>, tolerance: f64) -> Option<ValidationIssue> {
    let cost_per_unit = ingredients.numbers(columns::COST_PER_UNIT)?;
    let grams_per_unit = ingredients.numbers(columns::GRAMS_PER_UNIT)?;
    let cost_per_gram = ingredients.numbers(columns::COST_PER_GRAM)?;
    let keys = ingredients.row_keys(&[columns::INGREDIENT]);

    let mismatched = distinct((0..keys.len()).filter_map(|idx| {
        let (Some(cost), Some(grams), Some(stored)) =
            (cost_per_unit[idx], grams_per_unit[idx], cost_per_gram[idx])
        else {
            return None;
        };
        let derived = cost / grams;
        let consistent = derived.is_finite() && (derived - stored).abs() <= tolerance;
        (!consistent).then(|| keys[idx].clone())
    }));
    if mismatched.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::new(
            RuleId::CostPerGramDerivation,
            ingredients.kind,
            format!("Cost per gram mismatch beyond tolerance {tolerance:e} for"),
        )
        .with_offending(mismatched),
    )
}

fn container_check(ingredients: Source<'_>) -> Option<ValidationIssue> {
    let container_grams = ingredients.numbers(columns::CONTAINER_GRAMS)?;
    let grams_per_unit = ingredients.numbers(columns::GRAMS_PER_UNIT)?;
    let keys = ingredients.row_keys(&[columns::INGREDIENT]);

    let undersized = distinct(
        container_grams
            .iter()
            .zip(&grams_per_unit)
            .zip(keys)
            .filter_map(|((container, unit), key)| match (container, unit) {
                (Some(container), Some(unit)) if container < unit => Some(key),
                _ => None,
            }),
    );
    if undersized.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::new(
            RuleId::ContainerCoversUnit,
            ingredients.kind,
            format!(
                "{} < {} for",
                ingredients.qualified(columns::CONTAINER_GRAMS),
                ingredients.qualified(columns::GRAMS_PER_UNIT)
            ),
        )
        .with_offending(undersized),
    )
}
