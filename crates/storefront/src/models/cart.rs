//! Cart line type.

use serde::{Deserialize, Serialize};

use testmart_core::{Price, ProductId};

use super::product::Product;

/// One product in the cart.
///
/// The cart holds at most one line per product id, and `quantity` is always
/// at least one; a line whose quantity would drop to zero is removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID (the line key).
    pub id: ProductId,
    pub name: String,
    /// Unit price at the time the product was added.
    pub price: Price,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// A fresh line with quantity one.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}
