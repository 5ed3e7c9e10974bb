//! Catalog product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use testmart_core::{Price, ProductId, SpecialType};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Average star rating, one decimal place.
    pub rating: Decimal,
    pub category: String,
    pub description: String,
    pub in_stock: bool,
    /// Interactive fixture rendered in place of ordinary content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_type: Option<SpecialType>,
}

impl Product {
    /// Whether the product renders an interactive fixture.
    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.special_type.is_some()
    }

    /// Case-insensitive substring match against the product name.
    #[must_use]
    pub fn name_matches(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}
