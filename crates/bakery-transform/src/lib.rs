//! Dimensional transform for the bakery ETL.
//!
//! Turns validated source tables into a star schema:
//! - **Dimensions**: product, date, ingredient, each with a dense 1-based
//!   surrogate key assigned in source order
//! - **Bridge**: recipe lines re-keyed onto product and ingredient keys
//! - **Fact**: one row per resolved order with ingredient cost and gross
//!   margin
//!
//! The transform is deterministic and does no I/O. Keys are regenerated on
//! every run; nothing is persisted between runs.

mod bridge;
mod dimensions;
mod error;
mod fact;
mod records;

use std::time::Instant;

use tracing::{debug, info, info_span};

use bakery_ingest::TableSet;
use bakery_model::{DimensionalModel, JoinPolicy};

pub use bridge::{build_bridge, ingredient_cost_by_product};
pub use dimensions::{build_dim_date, build_dim_ingredient, build_dim_product};
pub use error::{Result, TransformError};
pub use fact::build_fact_orders;
pub use records::{IngredientRecord, OrderRecord, ProductRecord, RecipeLine, SourceRecords};

/// Extracts typed records from `tables` and builds the star schema.
pub fn transform_tables(tables: &TableSet, policy: JoinPolicy) -> Result<DimensionalModel> {
    let span = info_span!("transform");
    let _guard = span.enter();
    let start = Instant::now();

    let records = SourceRecords::from_tables(tables)?;
    let model = transform_records(&records, policy)?;

    for (table, rows) in model.row_counts() {
        debug!(table, rows, "built table");
    }
    info!(
        facts = model.fact_orders.len(),
        duration_ms = start.elapsed().as_millis(),
        "transform complete"
    );
    Ok(model)
}

/// Builds the star schema from already-extracted records.
pub fn transform_records(records: &SourceRecords, policy: JoinPolicy) -> Result<DimensionalModel> {
    let dim_product = build_dim_product(&records.products)?;
    let dim_date = build_dim_date(&records.orders);
    let dim_ingredient = build_dim_ingredient(&records.ingredients)?;
    let bridge = build_bridge(&records.recipes, &dim_product, &dim_ingredient);
    let costs = ingredient_cost_by_product(&bridge, &dim_ingredient);
    let fact_orders = build_fact_orders(&records.orders, &dim_product, &dim_date, &costs, policy)?;

    Ok(DimensionalModel {
        dim_product,
        dim_date,
        dim_ingredient,
        bridge,
        fact_orders,
    })
}
