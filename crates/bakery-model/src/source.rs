//! Source table classification and per-column semantic types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four source tables the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Products,
    Ingredients,
    Recipes,
    Orders,
}

impl SourceKind {
    /// Classifies a normalized table name (`shopify_orders`, `recipes`, ...).
    pub fn from_table_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name.contains("product") {
            Some(Self::Products)
        } else if name.contains("ingredient") {
            Some(Self::Ingredients)
        } else if name.contains("recipe") {
            Some(Self::Recipes)
        } else if name.contains("order") {
            Some(Self::Orders)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Ingredients => "Ingredients",
            Self::Recipes => "Recipes",
            Self::Orders => "Orders",
        }
    }

    /// Columns that must exist for the validation rules and the transform.
    ///
    /// Each entry is an alias list; the first alias is the canonical name.
    pub fn required_columns(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::Products => &[
                columns::PRODUCT_SKU,
                columns::PRODUCT_NAME,
                columns::CATEGORY,
                columns::PRICE,
            ],
            Self::Ingredients => &[
                columns::INGREDIENT,
                columns::UNIT,
                columns::GRAMS_PER_UNIT,
                columns::CONTAINER_GRAMS,
                columns::COST_PER_UNIT,
                columns::COST_PER_GRAM,
            ],
            Self::Recipes => &[
                columns::RECIPE_SKU,
                columns::INGREDIENT,
                columns::QUANTITY,
                columns::QUANTITY_UNIT,
            ],
            Self::Orders => &[
                columns::ORDER_ID,
                columns::ORDER_DATE,
                columns::ORDER_SKU,
                columns::QUANTITY,
                columns::TOTAL_PRICE,
            ],
        }
    }

    /// Columns that must hold numbers when present.
    pub fn numeric_columns(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::Products => &[columns::PRICE],
            Self::Ingredients => &[
                columns::GRAMS_PER_UNIT,
                columns::CONTAINER_GRAMS,
                columns::COST_PER_UNIT,
                columns::COST_PER_GRAM,
            ],
            Self::Recipes => &[columns::QUANTITY],
            Self::Orders => &[columns::QUANTITY, columns::TOTAL_PRICE],
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Semantic type of a loaded column, decided once when the table is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Date,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "int64",
            Self::Float => "float64",
            Self::Boolean => "bool",
            Self::Date => "date",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column alias lists. The first alias is the name used in messages.
pub mod columns {
    pub const PRODUCT_SKU: &[&str] = &["sku", "cookie_sku", "product_sku"];
    pub const PRODUCT_NAME: &[&str] = &["product_name", "name"];
    pub const CATEGORY: &[&str] = &["category"];
    pub const PRICE: &[&str] = &["price"];

    pub const INGREDIENT: &[&str] = &["ingredient", "ingredient_name"];
    pub const UNIT: &[&str] = &["unit"];
    pub const GRAMS_PER_UNIT: &[&str] = &["grams_per_unit"];
    pub const SUPPLIER: &[&str] = &["supplier"];
    pub const CONTAINER_DESCRIPTION: &[&str] = &["container_description"];
    pub const CONTAINER_GRAMS: &[&str] = &["container_grams"];
    pub const COST_PER_UNIT: &[&str] = &["cost_per_unit"];
    pub const COST_PER_GRAM: &[&str] = &["cost_per_gram"];

    pub const RECIPE_SKU: &[&str] = &["sku", "product_sku", "cookie_sku"];
    pub const QUANTITY: &[&str] = &["quantity"];
    pub const QUANTITY_UNIT: &[&str] = &["quantity_unit"];

    pub const ORDER_ID: &[&str] = &["order_id"];
    pub const ORDER_DATE: &[&str] = &["date", "order_date"];
    pub const ORDER_SKU: &[&str] = &["sku", "product_sku"];
    pub const ADD_ON_SKU: &[&str] = &["add_on_sku"];
    pub const TOTAL_PRICE: &[&str] = &["total_price"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_source_file_names() {
        assert_eq!(
            SourceKind::from_table_name("shopify_products"),
            Some(SourceKind::Products)
        );
        assert_eq!(
            SourceKind::from_table_name("shopify_orders"),
            Some(SourceKind::Orders)
        );
        assert_eq!(
            SourceKind::from_table_name("Recipes"),
            Some(SourceKind::Recipes)
        );
        assert_eq!(
            SourceKind::from_table_name("ingredients"),
            Some(SourceKind::Ingredients)
        );
        assert_eq!(SourceKind::from_table_name("suppliers"), None);
    }

    #[test]
    fn numeric_column_types() {
        assert!(ColumnType::Integer.is_numeric());
        assert!(ColumnType::Float.is_numeric());
        assert!(!ColumnType::Date.is_numeric());
        assert_eq!(ColumnType::Text.to_string(), "text");
    }
}
