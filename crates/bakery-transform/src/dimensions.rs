//! Dimension tables: product, date, ingredient.

use std::collections::HashSet;

use chrono::Datelike;

use bakery_ingest::date_key;
use bakery_model::{DimDate, DimIngredient, DimProduct, SurrogateKey};

use crate::error::{Result, TransformError};
use crate::records::{IngredientRecord, OrderRecord, ProductRecord};

/// Dense 1-based key for the row at `idx`.
pub(crate) fn surrogate_key(idx: usize, table: &'static str) -> Result<SurrogateKey> {
    idx.checked_add(1)
        .and_then(|key| SurrogateKey::try_from(key).ok())
        .ok_or(TransformError::KeySpaceExhausted { table })
}

/// Hashable stand-in for a float cell.
fn float_identity(value: Option<f64>) -> Option<u64> {
    value.map(f64::to_bits)
}

/// Distinct (sku, name, category, price) tuples in source order.
pub fn build_dim_product(products: &[ProductRecord]) -> Result<Vec<DimProduct>> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for product in products {
        let identity = (
            product.sku.clone(),
            product.name.clone(),
            product.category.clone(),
            float_identity(product.price),
        );
        if !seen.insert(identity) {
            continue;
        }
        rows.push(DimProduct {
            product_sku: product.sku.clone(),
            product_name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            product_key: surrogate_key(rows.len(), "dim_product")?,
        });
    }
    Ok(rows)
}

/// One row per distinct order day, in order of first appearance.
pub fn build_dim_date(orders: &[OrderRecord]) -> Vec<DimDate> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .map(|order| order.date)
        .filter(|date| seen.insert(*date))
        .map(|date| DimDate {
            date_key: date_key(date),
            date_only: date.format("%Y-%m-%d").to_string(),
            day_of_week: date.format("%A").to_string(),
            month: date.month(),
            year: date.year(),
        })
        .collect()
}

/// Distinct ingredient rows in source order, `cost_per_gram` derived from
/// `cost_per_unit / grams_per_unit`.
///
/// Rows are distinct over every source field, the stored `cost_per_gram`
/// included.
///
/// A zero or missing `grams_per_unit` leaves `cost_per_gram` empty.
pub fn build_dim_ingredient(ingredients: &[IngredientRecord]) -> Result<Vec<DimIngredient>> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for record in ingredients {
        let identity = (
            record.ingredient.clone(),
            record.unit.clone(),
            float_identity(record.grams_per_unit),
            record.supplier.clone(),
            record.container_description.clone(),
            float_identity(record.container_grams),
            float_identity(record.cost_per_unit),
            float_identity(record.stored_cost_per_gram),
        );
        if !seen.insert(identity) {
            continue;
        }
        let cost_per_gram = match (record.cost_per_unit, record.grams_per_unit) {
            (Some(cost), Some(grams)) => Some(cost / grams).filter(|value| value.is_finite()),
            _ => None,
        };
        rows.push(DimIngredient {
            ingredient: record.ingredient.clone(),
            unit: record.unit.clone(),
            grams_per_unit: record.grams_per_unit,
            supplier: record.supplier.clone(),
            container_description: record.container_description.clone(),
            container_grams: record.container_grams,
            cost_per_unit: record.cost_per_unit,
            cost_per_gram,
            ingredient_key: surrogate_key(rows.len(), "dim_ingredient")?,
        });
    }
    Ok(rows)
}
