//! Validation issue types.
//!
//! Every rule the validator runs has a stable [`RuleId`]; an issue pairs the
//! rule with the table it fired on, a human-readable message, and the
//! offending key values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::source::SourceKind;

/// Rule family used to group issues in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Structure,
    Referential,
    Domain,
    Consistency,
    Completeness,
}

impl RuleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "Structure",
            Self::Referential => "Referential",
            Self::Domain => "Domain",
            Self::Consistency => "Consistency",
            Self::Completeness => "Completeness",
        }
    }
}

/// Identifier of a single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    // Structure
    /// Required column is missing from a loaded table
    MissingColumn,
    /// Column expected to be numeric holds text
    NonNumericValue,
    /// Order date that is empty or not a calendar date
    UnparseableDate,

    // Referential
    OrderSkuReference,
    OrderAddOnReference,
    RecipeSkuReference,
    RecipeIngredientReference,
    RecipeUnitReference,

    // Domain
    OrderQuantityPositive,
    OrderTotalNonNegative,
    RecipeQuantityPositive,
    ProductPriceNonNegative,
    ProductCategoryAllowed,
    IngredientCostPerUnitNonNegative,
    IngredientCostPerGramNonNegative,

    // Derivation consistency
    CostPerGramDerivation,
    ContainerCoversUnit,

    // Completeness
    OrderIdPresent,
    ProductSkuPresent,
    IngredientNamePresent,
}

impl RuleId {
    pub fn category(&self) -> RuleCategory {
        match self {
            Self::MissingColumn | Self::NonNumericValue | Self::UnparseableDate => {
                RuleCategory::Structure
            }
            Self::OrderSkuReference
            | Self::OrderAddOnReference
            | Self::RecipeSkuReference
            | Self::RecipeIngredientReference
            | Self::RecipeUnitReference => RuleCategory::Referential,
            Self::OrderQuantityPositive
            | Self::OrderTotalNonNegative
            | Self::RecipeQuantityPositive
            | Self::ProductPriceNonNegative
            | Self::ProductCategoryAllowed
            | Self::IngredientCostPerUnitNonNegative
            | Self::IngredientCostPerGramNonNegative => RuleCategory::Domain,
            Self::CostPerGramDerivation | Self::ContainerCoversUnit => RuleCategory::Consistency,
            Self::OrderIdPresent | Self::ProductSkuPresent | Self::IngredientNamePresent => {
                RuleCategory::Completeness
            }
        }
    }

    /// Stable snake_case code, identical to the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingColumn => "missing_column",
            Self::NonNumericValue => "non_numeric_value",
            Self::UnparseableDate => "unparseable_date",
            Self::OrderSkuReference => "order_sku_reference",
            Self::OrderAddOnReference => "order_add_on_reference",
            Self::RecipeSkuReference => "recipe_sku_reference",
            Self::RecipeIngredientReference => "recipe_ingredient_reference",
            Self::RecipeUnitReference => "recipe_unit_reference",
            Self::OrderQuantityPositive => "order_quantity_positive",
            Self::OrderTotalNonNegative => "order_total_non_negative",
            Self::RecipeQuantityPositive => "recipe_quantity_positive",
            Self::ProductPriceNonNegative => "product_price_non_negative",
            Self::ProductCategoryAllowed => "product_category_allowed",
            Self::IngredientCostPerUnitNonNegative => "ingredient_cost_per_unit_non_negative",
            Self::IngredientCostPerGramNonNegative => "ingredient_cost_per_gram_non_negative",
            Self::CostPerGramDerivation => "cost_per_gram_derivation",
            Self::ContainerCoversUnit => "container_covers_unit",
            Self::OrderIdPresent => "order_id_present",
            Self::ProductSkuPresent => "product_sku_present",
            Self::IngredientNamePresent => "ingredient_name_present",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One violated rule on one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub rule: RuleId,
    pub category: RuleCategory,
    pub table: SourceKind,
    pub message: String,
    /// Distinct offending key values in first-seen order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offending: Vec<String>,
}

impl ValidationIssue {
    pub fn new(rule: RuleId, table: SourceKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            category: rule.category(),
            table,
            message: message.into(),
            offending: Vec::new(),
        }
    }

    pub fn with_offending(mut self, offending: Vec<String>) -> Self {
        self.offending = offending;
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.offending.is_empty() {
            write!(f, ": {}", self.offending.join(", "))?;
        }
        Ok(())
    }
}
