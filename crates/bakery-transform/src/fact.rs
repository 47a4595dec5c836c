//! Order fact table.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use bakery_ingest::date_key;
use bakery_model::{DimDate, DimProduct, FactOrder, JoinPolicy, SurrogateKey};

use crate::bridge::index_by;
use crate::error::{Result, TransformError};
use crate::records::OrderRecord;

/// Number of unresolved order ids carried in an error.
const UNRESOLVED_SAMPLE: usize = 5;

/// Joins orders to the product and date dimensions and attaches the
/// per-product ingredient cost.
///
/// Product and date joins are inner joins; what happens to an order that
/// misses either is decided by `policy`. The cost join is a left join: an
/// order whose product has no recipe keeps an empty `ingredient_cost`, and
/// its `gross_margin` is empty too.
pub fn build_fact_orders(
    orders: &[OrderRecord],
    products: &[DimProduct],
    dates: &[DimDate],
    costs: &BTreeMap<SurrogateKey, f64>,
    policy: JoinPolicy,
) -> Result<Vec<FactOrder>> {
    let products_by_sku = index_by(products, |row| row.product_sku.as_deref());
    let date_keys: HashMap<u32, &DimDate> = dates.iter().map(|row| (row.date_key, row)).collect();

    let mut rows = Vec::with_capacity(orders.len());
    let mut unresolved = Vec::new();
    for order in orders {
        let order_date_key = date_key(order.date);
        let matched = order
            .sku
            .as_deref()
            .and_then(|sku| products_by_sku.get(sku))
            .filter(|_| date_keys.contains_key(&order_date_key));
        let Some(matched) = matched else {
            unresolved.push(order.order_id.clone());
            continue;
        };
        for product in matched {
            let ingredient_cost = costs.get(&product.product_key).copied();
            let gross_margin = order
                .total_price
                .zip(ingredient_cost)
                .map(|(total, cost)| total - cost);
            rows.push(FactOrder {
                order_id: order.order_id.clone(),
                product_key: product.product_key,
                date_key: order_date_key,
                quantity: order.quantity,
                total_price: order.total_price,
                ingredient_cost,
                gross_margin,
            });
        }
    }

    if !unresolved.is_empty() {
        match policy {
            JoinPolicy::Fail => {
                return Err(TransformError::UnresolvedJoin {
                    count: unresolved.len(),
                    order_ids: unresolved.into_iter().take(UNRESOLVED_SAMPLE).collect(),
                });
            }
            JoinPolicy::DropUnmatched => {
                warn!(
                    dropped = unresolved.len(),
                    first = %unresolved[0],
                    "orders dropped from fact_orders: product or date did not resolve"
                );
            }
        }
    }

    Ok(rows)
}
