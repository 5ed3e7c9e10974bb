//! Checkout: turns the cart and a shipping form into an order confirmation.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument};

use crate::forms::{FieldErrors, ShippingForm};
use crate::models::{Account, OrderConfirmation};
use crate::services::cart::CartStore;

/// Errors that can occur when placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// One or more shipping fields failed validation.
    #[error("invalid shipping details: {0}")]
    InvalidForm(FieldErrors),
}

/// Order number for an order placed at `placed_at`: `TM` and the last six
/// digits of the millisecond timestamp.
#[must_use]
pub fn order_number(placed_at: DateTime<Utc>) -> String {
    format!("TM{:06}", placed_at.timestamp_millis().rem_euclid(1_000_000))
}

/// Place a mock order for everything in the cart.
///
/// The cart is cleared only when the order is placed.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart and
/// `CheckoutError::InvalidForm` with every failing field otherwise.
#[instrument(skip_all, fields(lines = cart.lines().len()))]
pub fn place_order(
    cart: &mut CartStore,
    form: &ShippingForm,
    customer: Option<&Account>,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let shipping = form.validate().map_err(CheckoutError::InvalidForm)?;

    let placed_at = Utc::now();
    let order = OrderConfirmation {
        order_number: order_number(placed_at),
        items: cart.lines().to_vec(),
        subtotal: cart.subtotal(),
        discount: cart.discount(),
        total: cart.total(),
        shipping,
        customer: customer.map(|account| account.email.clone()),
        placed_at,
    };
    info!(order_number = %order.order_number, total = %order.total, "Order placed");

    cart.clear();
    Ok(order)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use testmart_core::{Price, ProductId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn form() -> ShippingForm {
        ShippingForm {
            first_name: "Tess".to_string(),
            last_name: "Tester".to_string(),
            email: "tess@test.com".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "CA".to_string(),
            zip_code: "90210".to_string(),
            ..ShippingForm::default()
        }
    }

    #[test]
    fn test_order_number_format() {
        let at = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
        assert_eq!(order_number(at), "TM123456");

        let at = Utc.timestamp_millis_opt(1_700_000_000_042).unwrap();
        assert_eq!(order_number(at), "TM000042");
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut cart = CartStore::new(MemoryStorage::shared());
        assert_eq!(
            place_order(&mut cart, &form(), None).unwrap_err(),
            CheckoutError::EmptyCart
        );
    }

    #[test]
    fn test_invalid_form_keeps_cart() {
        let mut cart = CartStore::new(MemoryStorage::shared());
        cart.add_product(ProductId::new(6)).unwrap();

        let err = place_order(&mut cart, &ShippingForm::default(), None).unwrap_err();
        let CheckoutError::InvalidForm(errors) = err else {
            panic!("expected form errors");
        };
        assert_eq!(errors.get("city"), Some("City is required"));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_order_uses_discounted_total_and_clears_cart() {
        let mut cart = CartStore::new(MemoryStorage::shared());
        cart.add_product(ProductId::new(6)).unwrap();
        cart.add_product(ProductId::new(6)).unwrap();
        cart.apply_coupon("TEST50").unwrap();

        let order = place_order(&mut cart, &form(), None).unwrap();
        assert!(order.order_number.starts_with("TM"));
        assert_eq!(order.order_number.len(), 8);
        assert_eq!(order.subtotal, Price::from_cents(15_998));
        assert_eq!(order.total, Price::from_cents(7_999));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.customer, None);

        assert!(cart.is_empty());
        assert!(cart.discount().is_none());
    }
}
