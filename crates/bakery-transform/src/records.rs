//! Typed rows extracted from the loaded source tables.

use chrono::NaiveDate;

use bakery_ingest::{SourceTable, TableSet, parse_calendar_date};
use bakery_model::{SourceKind, columns};

use crate::error::{Result, TransformError};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRecord {
    pub ingredient: Option<String>,
    pub unit: Option<String>,
    pub grams_per_unit: Option<f64>,
    pub supplier: Option<String>,
    pub container_description: Option<String>,
    pub container_grams: Option<f64>,
    pub cost_per_unit: Option<f64>,
    /// Value as stored in the source; dim_ingredient recomputes it.
    pub stored_cost_per_gram: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLine {
    pub sku: Option<String>,
    pub ingredient: Option<String>,
    pub quantity: Option<f64>,
    pub quantity_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub date: NaiveDate,
    pub sku: Option<String>,
    pub quantity: Option<f64>,
    pub total_price: Option<f64>,
}

/// All four source tables as typed rows, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecords {
    pub products: Vec<ProductRecord>,
    pub ingredients: Vec<IngredientRecord>,
    pub recipes: Vec<RecipeLine>,
    pub orders: Vec<OrderRecord>,
}

impl SourceRecords {
    pub fn from_tables(tables: &TableSet) -> Result<Self> {
        Ok(Self {
            products: products(require(tables, SourceKind::Products)?)?,
            ingredients: ingredients(require(tables, SourceKind::Ingredients)?)?,
            recipes: recipes(require(tables, SourceKind::Recipes)?)?,
            orders: orders(require(tables, SourceKind::Orders)?)?,
        })
    }
}

fn require(tables: &TableSet, kind: SourceKind) -> Result<&SourceTable> {
    tables
        .by_kind(kind)
        .ok_or(TransformError::MissingTable(kind))
}

/// Column access for one source table.
struct Columns<'a> {
    table: &'a SourceTable,
    kind: SourceKind,
}

impl Columns<'_> {
    fn missing(&self, aliases: &'static [&'static str]) -> TransformError {
        TransformError::MissingColumn {
            table: self.kind,
            column: aliases.first().copied().unwrap_or_default(),
        }
    }

    fn text(&self, aliases: &'static [&'static str]) -> Result<Vec<Option<String>>> {
        self.table
            .text_values(aliases)
            .ok_or_else(|| self.missing(aliases))
    }

    fn number(&self, aliases: &'static [&'static str]) -> Result<Vec<Option<f64>>> {
        self.table
            .numeric_values(aliases)
            .ok_or_else(|| self.missing(aliases))
    }

    fn optional_text(&self, aliases: &[&str]) -> Vec<Option<String>> {
        self.table
            .text_values(aliases)
            .unwrap_or_else(|| vec![None; self.table.row_count()])
    }

    fn optional_number(&self, aliases: &[&str]) -> Vec<Option<f64>> {
        self.table
            .numeric_values(aliases)
            .unwrap_or_else(|| vec![None; self.table.row_count()])
    }
}

fn products(table: &SourceTable) -> Result<Vec<ProductRecord>> {
    let cols = Columns {
        table,
        kind: SourceKind::Products,
    };
    let sku = cols.text(columns::PRODUCT_SKU)?;
    let name = cols.text(columns::PRODUCT_NAME)?;
    let category = cols.text(columns::CATEGORY)?;
    let price = cols.number(columns::PRICE)?;

    Ok((0..table.row_count())
        .map(|idx| ProductRecord {
            sku: sku[idx].clone(),
            name: name[idx].clone(),
            category: category[idx].clone(),
            price: price[idx],
        })
        .collect())
}

fn ingredients(table: &SourceTable) -> Result<Vec<IngredientRecord>> {
    let cols = Columns {
        table,
        kind: SourceKind::Ingredients,
    };
    let ingredient = cols.text(columns::INGREDIENT)?;
    let grams_per_unit = cols.number(columns::GRAMS_PER_UNIT)?;
    let cost_per_unit = cols.number(columns::COST_PER_UNIT)?;
    let unit = cols.optional_text(columns::UNIT);
    let supplier = cols.optional_text(columns::SUPPLIER);
    let container_description = cols.optional_text(columns::CONTAINER_DESCRIPTION);
    let container_grams = cols.optional_number(columns::CONTAINER_GRAMS);
    let stored_cost_per_gram = cols.optional_number(columns::COST_PER_GRAM);

    Ok((0..table.row_count())
        .map(|idx| IngredientRecord {
            ingredient: ingredient[idx].clone(),
            unit: unit[idx].clone(),
            grams_per_unit: grams_per_unit[idx],
            supplier: supplier[idx].clone(),
            container_description: container_description[idx].clone(),
            container_grams: container_grams[idx],
            cost_per_unit: cost_per_unit[idx],
            stored_cost_per_gram: stored_cost_per_gram[idx],
        })
        .collect())
}

fn recipes(table: &SourceTable) -> Result<Vec<RecipeLine>> {
    let cols = Columns {
        table,
        kind: SourceKind::Recipes,
    };
    let sku = cols.text(columns::RECIPE_SKU)?;
    let ingredient = cols.text(columns::INGREDIENT)?;
    let quantity = cols.number(columns::QUANTITY)?;
    let quantity_unit = cols.text(columns::QUANTITY_UNIT)?;

    Ok((0..table.row_count())
        .map(|idx| RecipeLine {
            sku: sku[idx].clone(),
            ingredient: ingredient[idx].clone(),
            quantity: quantity[idx],
            quantity_unit: quantity_unit[idx].clone(),
        })
        .collect())
}

fn orders(table: &SourceTable) -> Result<Vec<OrderRecord>> {
    let cols = Columns {
        table,
        kind: SourceKind::Orders,
    };
    let order_id = cols.text(columns::ORDER_ID)?;
    let date = cols.text(columns::ORDER_DATE)?;
    let sku = cols.text(columns::ORDER_SKU)?;
    let quantity = cols.number(columns::QUANTITY)?;
    let total_price = cols.number(columns::TOTAL_PRICE)?;

    (0..table.row_count())
        .map(|idx| {
            let raw_date = date[idx].clone().unwrap_or_default();
            let parsed = parse_calendar_date(&raw_date).ok_or(TransformError::InvalidDate {
                row: idx + 1,
                value: raw_date,
            })?;
            Ok(OrderRecord {
                order_id: order_id[idx].clone().unwrap_or_default(),
                date: parsed,
                sku: sku[idx].clone(),
                quantity: quantity[idx],
                total_price: total_price[idx],
            })
        })
        .collect()
}
