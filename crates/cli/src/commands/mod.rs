//! Command implementations.
//!
//! Each command drives the storefront stores and returns a serializable
//! report; `main` hands the report to [`crate::output::Output`].

pub mod alerts;
pub mod cart;
pub mod chat;
pub mod reviews;
pub mod scenarios;
pub mod session;
pub mod shop;

use serde::Serialize;

use testmart_core::ProductId;
use testmart_storefront::models::Product;
use testmart_storefront::{AppError, Result, catalog};

use crate::output::{Render, table};

/// Look up a catalog product.
pub fn product(id: ProductId) -> Result<&'static Product> {
    catalog::product(id).ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// A list of products.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ProductRows(pub Vec<Product>);

impl ProductRows {
    pub fn from_refs<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        Self(products.into_iter().cloned().collect())
    }
}

impl Render for ProductRows {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return "No products found.".to_string();
        }
        let mut t = table(["ID", "Name", "Category", "Price", "Rating", "Stock", "Special"]);
        for p in &self.0 {
            t.add_row([
                p.id.to_string(),
                p.name.clone(),
                p.category.clone(),
                p.price.to_string(),
                p.rating.to_string(),
                if p.in_stock { "In stock" } else { "Out of stock" }.to_string(),
                p.special_type.map(|s| s.to_string()).unwrap_or_default(),
            ]);
        }
        t.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_lookup() {
        assert!(product(ProductId::new(1)).is_ok());
        assert!(matches!(
            product(ProductId::new(404)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_rows_render_placeholder() {
        assert_eq!(ProductRows(Vec::new()).render(), "No products found.");
    }
}
