//! Cart store.
//!
//! Holds one line per product plus a single coupon discount. Totals are
//! derived on demand and never stored. Every line mutation writes the whole
//! line list back to storage; the applied coupon lives only as long as the
//! store does.

use thiserror::Error;
use tracing::{debug, info, instrument};

use testmart_core::{DiscountRate, Price, ProductId};

use crate::catalog;
use crate::models::{CartLine, Product};
use crate::storage::{Persisted, SharedStorage, keys};

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Coupon code is not in the coupon table.
    #[error("invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// Product cannot be added because it is out of stock.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// No catalog product has this id.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}

/// The shopping cart.
#[derive(Debug)]
pub struct CartStore {
    lines: Vec<CartLine>,
    discount: DiscountRate,
    coupon: Option<String>,
    slot: Persisted<Vec<CartLine>>,
}

impl CartStore {
    /// Create the store, restoring persisted lines.
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        let slot = Persisted::new(storage, keys::CART_ITEMS);
        let lines: Vec<CartLine> = slot.load().unwrap_or_default();
        debug!(lines = lines.len(), "Loaded cart");
        Self {
            lines,
            discount: DiscountRate::NONE,
            coupon: None,
            slot,
        }
    }

    /// Add one unit of a product, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` if the product is not in stock.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_line(&mut self, product: &Product) -> Result<u32, CartError> {
        if !product.in_stock {
            return Err(CartError::OutOfStock(product.id));
        }

        let quantity = if let Some(line) = self.lines.iter_mut().find(|l| l.id == product.id) {
            line.quantity += 1;
            line.quantity
        } else {
            self.lines.push(CartLine::from_product(product));
            1
        };

        self.persist();
        info!(quantity, "Added to cart");
        Ok(quantity)
    }

    /// Add one unit of a catalog product by id.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` for unknown ids, otherwise as
    /// [`CartStore::add_line`].
    pub fn add_product(&mut self, id: ProductId) -> Result<u32, CartError> {
        let product = catalog::product(id).ok_or(CartError::ProductNotFound(id))?;
        self.add_line(product)
    }

    /// Delete a line. Removing a product that is not in the cart is a no-op.
    pub fn remove_line(&mut self, id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() != before {
            info!(product_id = %id, "Removed from cart");
        }
        self.persist();
    }

    /// Replace a line's quantity; zero or less removes the line.
    ///
    /// Setting the quantity of a product that is not in the cart does
    /// nothing.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            self.remove_line(id);
            return;
        };
        if quantity == 0 {
            self.remove_line(id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = quantity;
            debug!(product_id = %id, quantity, "Updated quantity");
        }
        self.persist();
    }

    /// Apply a coupon, replacing any coupon applied before.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidCoupon` for unknown codes; the current
    /// discount is left unchanged.
    #[instrument(skip(self))]
    pub fn apply_coupon(&mut self, code: &str) -> Result<DiscountRate, CartError> {
        let rate = catalog::coupon(code).ok_or_else(|| CartError::InvalidCoupon(code.to_string()))?;
        self.discount = rate;
        self.coupon = Some(code.to_string());
        info!(discount = %rate, "Coupon applied");
        Ok(rate)
    }

    /// Empty the cart and drop the coupon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount = DiscountRate::NONE;
        self.coupon = None;
        self.slot.remove();
        info!("Cart cleared");
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The quantity of a product in the cart, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.id == id)
            .map_or(0, |l| l.quantity)
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals before discount.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum::<Price>().round_cents()
    }

    #[must_use]
    pub const fn discount(&self) -> DiscountRate {
        self.discount
    }

    /// The code of the applied coupon, if any.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<&str> {
        self.coupon.as_deref()
    }

    /// Amount the coupon takes off the subtotal.
    #[must_use]
    pub fn discount_amount(&self) -> Price {
        self.discount.savings(self.subtotal())
    }

    /// `subtotal * (1 - discount)`, rounded to cents.
    #[must_use]
    pub fn total(&self) -> Price {
        self.discount.apply(self.subtotal())
    }

    fn persist(&self) {
        self.slot.save(&self.lines);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> CartStore {
        CartStore::new(MemoryStorage::shared())
    }

    fn product(id: u32) -> &'static Product {
        catalog::product(ProductId::new(id)).unwrap()
    }

    #[test]
    fn test_add_twice_merges_lines() {
        let mut cart = store();
        assert_eq!(cart.add_line(product(1)).unwrap(), 1);
        assert_eq!(cart.add_line(product(1)).unwrap(), 2);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal(), Price::from_cents(59_998));
    }

    #[test]
    fn test_out_of_stock_rejected() {
        let mut cart = store();
        let stand = product(7);
        assert_eq!(cart.add_line(stand), Err(CartError::OutOfStock(stand.id)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_unknown_product() {
        let mut cart = store();
        let id = ProductId::new(404);
        assert_eq!(cart.add_product(id), Err(CartError::ProductNotFound(id)));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = store();
        cart.add_line(product(1)).unwrap();
        cart.add_line(product(8)).unwrap();
        cart.set_quantity(ProductId::new(8), 5);
        assert_eq!(cart.total_items(), 6);

        cart.set_quantity(ProductId::new(8), 0);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(8)), 0);

        cart.set_quantity(ProductId::new(1), -2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_of_missing_line_is_noop() {
        let mut cart = store();
        cart.set_quantity(ProductId::new(3), 4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_coupon_applies_to_subtotal() {
        let mut cart = store();
        cart.add_line(product(12)).unwrap();
        cart.set_quantity(ProductId::new(12), 2);
        cart.add_line(product(9)).unwrap();
        cart.set_quantity(ProductId::new(9), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(11_495));

        cart.apply_coupon("SAVE10").unwrap();
        assert_eq!(cart.total(), Price::from_cents(10_346));
        assert_eq!(cart.discount_amount(), Price::from_cents(1_149));
    }

    #[test]
    fn test_save10_on_round_hundred() {
        let mut cart = store();
        let mut hundred = product(1).clone();
        hundred.price = Price::from_cents(10_000);
        cart.add_line(&hundred).unwrap();

        cart.apply_coupon("SAVE10").unwrap();
        assert_eq!(cart.total(), Price::from_cents(9_000));
    }

    #[test]
    fn test_invalid_coupon_keeps_discount() {
        let mut cart = store();
        cart.apply_coupon("WELCOME20").unwrap();
        assert_eq!(
            cart.apply_coupon("BOGUS"),
            Err(CartError::InvalidCoupon("BOGUS".to_string()))
        );
        assert_eq!(cart.discount(), DiscountRate::from_percent(20).unwrap());
        assert_eq!(cart.applied_coupon(), Some("WELCOME20"));
    }

    #[test]
    fn test_last_coupon_wins() {
        let mut cart = store();
        cart.apply_coupon("TEST50").unwrap();
        cart.apply_coupon("SAVE10").unwrap();
        assert_eq!(cart.discount(), DiscountRate::from_percent(10).unwrap());
    }

    #[test]
    fn test_clear_resets_discount_and_storage() {
        let storage = MemoryStorage::shared();
        let mut cart = CartStore::new(storage.clone());
        cart.add_line(product(2)).unwrap();
        cart.apply_coupon("SAVE10").unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.discount().is_none());
        assert!(CartStore::new(storage).is_empty());
    }

    #[test]
    fn test_lines_persist_but_coupon_does_not() {
        let storage = MemoryStorage::shared();
        let mut cart = CartStore::new(storage.clone());
        cart.add_line(product(5)).unwrap();
        cart.add_line(product(5)).unwrap();
        cart.apply_coupon("SAVE10").unwrap();

        let restored = CartStore::new(storage);
        assert_eq!(restored.lines(), cart.lines());
        assert!(restored.discount().is_none());
    }
}
