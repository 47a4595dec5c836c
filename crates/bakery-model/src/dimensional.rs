//! Row types of the star schema produced by the transform.
//!
//! Field order is the column order of the staged CSV files. Empty cells are
//! `None`.

use serde::Serialize;

/// Surrogate key, dense and 1-based within one run.
pub type SurrogateKey = u32;

/// One distinct (sku, name, category, price) product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimProduct {
    pub product_sku: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub product_key: SurrogateKey,
}

/// One distinct calendar day on which orders were placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimDate {
    /// `YYYYMMDD`; natural and surrogate key at once.
    pub date_key: u32,
    /// ISO `YYYY-MM-DD`.
    pub date_only: String,
    /// English weekday name (`Monday`).
    pub day_of_week: String,
    pub month: u32,
    pub year: i32,
}

/// One distinct ingredient with its cost per gram recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimIngredient {
    pub ingredient: Option<String>,
    pub unit: Option<String>,
    pub grams_per_unit: Option<f64>,
    pub supplier: Option<String>,
    pub container_description: Option<String>,
    pub container_grams: Option<f64>,
    pub cost_per_unit: Option<f64>,
    pub cost_per_gram: Option<f64>,
    pub ingredient_key: SurrogateKey,
}

/// A recipe line re-keyed onto surrogate keys.
///
/// Keys are empty when the recipe's sku or ingredient did not resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeProductIngredient {
    pub product_key: Option<SurrogateKey>,
    pub ingredient_key: Option<SurrogateKey>,
    pub quantity: Option<f64>,
    pub quantity_unit: Option<String>,
}

/// One order with its derived cost and margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactOrder {
    pub order_id: String,
    pub product_key: SurrogateKey,
    pub date_key: u32,
    pub quantity: Option<f64>,
    pub total_price: Option<f64>,
    /// Empty when the product has no recipe lines.
    pub ingredient_cost: Option<f64>,
    pub gross_margin: Option<f64>,
}

/// Output table names, in write order.
pub const DIM_PRODUCT: &str = "dim_product";
pub const DIM_DATE: &str = "dim_date";
pub const DIM_INGREDIENT: &str = "dim_ingredient";
pub const BRIDGE_PRODUCT_INGREDIENT: &str = "bridge_product_ingredient";
pub const FACT_ORDERS: &str = "fact_orders";

/// A row type written as one staged output table.
///
/// `COLUMNS` matches the serialized field order, so a header can be written
/// for a table with no rows.
pub trait StagedRow: Serialize {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
}

impl StagedRow for DimProduct {
    const TABLE: &'static str = DIM_PRODUCT;
    const COLUMNS: &'static [&'static str] =
        &["product_sku", "product_name", "category", "price", "product_key"];
}

impl StagedRow for DimDate {
    const TABLE: &'static str = DIM_DATE;
    const COLUMNS: &'static [&'static str] =
        &["date_key", "date_only", "day_of_week", "month", "year"];
}

impl StagedRow for DimIngredient {
    const TABLE: &'static str = DIM_INGREDIENT;
    const COLUMNS: &'static [&'static str] = &[
        "ingredient",
        "unit",
        "grams_per_unit",
        "supplier",
        "container_description",
        "container_grams",
        "cost_per_unit",
        "cost_per_gram",
        "ingredient_key",
    ];
}

impl StagedRow for BridgeProductIngredient {
    const TABLE: &'static str = BRIDGE_PRODUCT_INGREDIENT;
    const COLUMNS: &'static [&'static str] =
        &["product_key", "ingredient_key", "quantity", "quantity_unit"];
}

impl StagedRow for FactOrder {
    const TABLE: &'static str = FACT_ORDERS;
    const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "product_key",
        "date_key",
        "quantity",
        "total_price",
        "ingredient_cost",
        "gross_margin",
    ];
}

/// The complete star schema for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionalModel {
    pub dim_product: Vec<DimProduct>,
    pub dim_date: Vec<DimDate>,
    pub dim_ingredient: Vec<DimIngredient>,
    pub bridge: Vec<BridgeProductIngredient>,
    pub fact_orders: Vec<FactOrder>,
}

impl DimensionalModel {
    /// `(table name, row count)` for every output table.
    pub fn row_counts(&self) -> [(&'static str, usize); 5] {
        [
            (DIM_PRODUCT, self.dim_product.len()),
            (DIM_DATE, self.dim_date.len()),
            (DIM_INGREDIENT, self.dim_ingredient.len()),
            (BRIDGE_PRODUCT_INGREDIENT, self.bridge.len()),
            (FACT_ORDERS, self.fact_orders.len()),
        ]
    }
}
