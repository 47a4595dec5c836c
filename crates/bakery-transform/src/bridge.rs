//! Product-ingredient bridge and per-product ingredient cost.

use std::collections::{BTreeMap, HashMap};

use bakery_model::{BridgeProductIngredient, DimIngredient, DimProduct, SurrogateKey};

use crate::records::RecipeLine;

/// Rows grouped by natural key; rows without one are left out.
pub(crate) fn index_by<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> Option<&'a str>,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut index: HashMap<&str, Vec<&T>> = HashMap::new();
    for row in rows {
        if let Some(value) = key(row) {
            index.entry(value).or_default().push(row);
        }
    }
    index
}

/// Re-keys recipe lines onto product and ingredient surrogate keys.
///
/// Left-join semantics on both sides: a line whose sku or ingredient does
/// not resolve keeps an empty key, and a natural key matching several
/// dimension rows fans the line out once per match.
pub fn build_bridge(
    recipes: &[RecipeLine],
    products: &[DimProduct],
    ingredients: &[DimIngredient],
) -> Vec<BridgeProductIngredient> {
    let products_by_sku = index_by(products, |row| row.product_sku.as_deref());
    let ingredients_by_name = index_by(ingredients, |row| row.ingredient.as_deref());

    let mut rows = Vec::new();
    for line in recipes {
        let product_keys = matching_keys(line.sku.as_deref(), &products_by_sku, |row| {
            row.product_key
        });
        let ingredient_keys = matching_keys(
            line.ingredient.as_deref(),
            &ingredients_by_name,
            |row| row.ingredient_key,
        );
        for product_key in &product_keys {
            for ingredient_key in &ingredient_keys {
                rows.push(BridgeProductIngredient {
                    product_key: *product_key,
                    ingredient_key: *ingredient_key,
                    quantity: line.quantity,
                    quantity_unit: line.quantity_unit.clone(),
                });
            }
        }
    }
    rows
}

fn matching_keys<T>(
    natural_key: Option<&str>,
    index: &HashMap<&str, Vec<&T>>,
    surrogate: impl Fn(&T) -> SurrogateKey,
) -> Vec<Option<SurrogateKey>> {
    match natural_key.and_then(|key| index.get(key)) {
        Some(matches) => matches.iter().map(|row| Some(surrogate(row))).collect(),
        None => vec![None],
    }
}

/// Sum of `quantity * cost_per_gram` over each product's bridge rows.
///
/// Products without resolved bridge rows are absent. Rows missing a quantity
/// or a cost contribute nothing to their product's sum.
pub fn ingredient_cost_by_product(
    bridge: &[BridgeProductIngredient],
    ingredients: &[DimIngredient],
) -> BTreeMap<SurrogateKey, f64> {
    let cost_per_gram: HashMap<SurrogateKey, Option<f64>> = ingredients
        .iter()
        .map(|row| (row.ingredient_key, row.cost_per_gram))
        .collect();

    let mut costs = BTreeMap::new();
    for row in bridge {
        let (Some(product_key), Some(ingredient_key)) = (row.product_key, row.ingredient_key)
        else {
            continue;
        };
        let Some(unit_cost) = cost_per_gram.get(&ingredient_key) else {
            continue;
        };
        let total = costs.entry(product_key).or_insert(0.0);
        if let (Some(quantity), Some(unit_cost)) = (row.quantity, unit_cost) {
            *total += quantity * unit_cost;
        }
    }
    costs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sku: &str, key: SurrogateKey) -> DimProduct {
        DimProduct {
            product_sku: Some(sku.to_string()),
            product_name: None,
            category: None,
            price: None,
            product_key: key,
        }
    }

    fn ingredient(name: &str, cost_per_gram: Option<f64>, key: SurrogateKey) -> DimIngredient {
        DimIngredient {
            ingredient: Some(name.to_string()),
            unit: Some("cup".to_string()),
            grams_per_unit: None,
            supplier: None,
            container_description: None,
            container_grams: None,
            cost_per_unit: None,
            cost_per_gram,
            ingredient_key: key,
        }
    }

    fn line(sku: &str, ingredient: &str, quantity: f64) -> RecipeLine {
        RecipeLine {
            sku: Some(sku.to_string()),
            ingredient: Some(ingredient.to_string()),
            quantity: Some(quantity),
            quantity_unit: Some("cup".to_string()),
        }
    }

    #[test]
    fn unresolved_sides_keep_empty_keys() {
        let products = [product("CK-CHOC-001", 1)];
        let ingredients = [ingredient("flour", Some(0.0025), 1)];
        let bridge = build_bridge(
            &[
                line("CK-CHOC-001", "flour", 2.0),
                line("CK-GONE-001", "flour", 1.0),
                line("CK-CHOC-001", "saffron", 1.0),
            ],
            &products,
            &ingredients,
        );
        let keys: Vec<_> = bridge
            .iter()
            .map(|row| (row.product_key, row.ingredient_key))
            .collect();
        assert_eq!(keys, vec![(Some(1), Some(1)), (None, Some(1)), (Some(1), None)]);
    }

    #[test]
    fn duplicate_natural_keys_fan_out() {
        let products = [product("CK-CHOC-001", 1), product("CK-CHOC-001", 2)];
        let ingredients = [ingredient("flour", Some(0.0025), 1)];
        let bridge = build_bridge(&[line("CK-CHOC-001", "flour", 2.0)], &products, &ingredients);
        assert_eq!(bridge.len(), 2);
        assert_eq!(bridge[1].product_key, Some(2));
    }

    #[test]
    fn costs_sum_per_product() {
        let products = [product("A", 1), product("B", 2), product("C", 3)];
        let ingredients = [
            ingredient("flour", Some(0.0025), 1),
            ingredient("butter", Some(0.01), 2),
            ingredient("mystery", None, 3),
        ];
        let bridge = build_bridge(
            &[
                line("A", "flour", 200.0),
                line("A", "butter", 100.0),
                line("B", "mystery", 5.0),
                line("Z", "flour", 1.0),
            ],
            &products,
            &ingredients,
        );
        let costs = ingredient_cost_by_product(&bridge, &ingredients);
        assert_eq!(costs.len(), 2);
        assert!((costs[&1] - 1.5).abs() < 1e-12);
        assert_eq!(costs[&2], 0.0);
        assert!(!costs.contains_key(&3));
    }
}
