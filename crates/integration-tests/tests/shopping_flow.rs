//! Sign-in, cart, coupon and checkout across the storefront's stores.

#![allow(clippy::unwrap_used)]

use testmart_core::{DiscountRate, Price, ProductId};
use testmart_integration_tests::TestContext;
use testmart_storefront::AppError;
use testmart_storefront::forms::ShippingForm;
use testmart_storefront::services::cart::CartError;
use testmart_storefront::services::checkout::CheckoutError;

fn shipping(email: &str) -> ShippingForm {
    ShippingForm {
        first_name: "John".to_string(),
        last_name: "Buyer".to_string(),
        email: email.to_string(),
        phone: "555-0100".to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "CA".to_string(),
        zip_code: "90210".to_string(),
        ..ShippingForm::default()
    }
}

#[test]
fn test_signed_in_checkout_with_coupon() {
    let mut ctx = TestContext::new();
    let store = &mut ctx.store;

    store
        .session_mut()
        .authenticate("buyer@test.com", "buyer123")
        .unwrap();

    let cart = store.cart_mut();
    cart.add_product(ProductId::new(1)).unwrap();
    cart.add_product(ProductId::new(1)).unwrap();
    cart.add_product(ProductId::new(3)).unwrap();
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.subtotal(), Price::from_cents(149_997));

    let rate = cart.apply_coupon("SAVE10").unwrap();
    assert_eq!(rate, DiscountRate::from_percent(10).unwrap());
    assert_eq!(cart.total(), Price::from_cents(134_997));

    let order = store.checkout(&shipping("buyer@test.com")).unwrap();
    assert!(order.order_number.starts_with("TM"));
    assert_eq!(order.order_number.len(), 8);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total, Price::from_cents(134_997));
    assert_eq!(order.shipping.country, "US");
    assert_eq!(
        order.customer.as_ref().map(|e| e.as_str()),
        Some("buyer@test.com")
    );

    assert!(store.cart().is_empty());
    assert!(store.cart().discount().is_none());
    assert!(ctx.reopen().cart().is_empty());
}

#[test]
fn test_guest_checkout_has_no_customer() {
    let mut ctx = TestContext::new();
    ctx.store.cart_mut().add_product(ProductId::new(9)).unwrap();

    let order = ctx.store.checkout(&shipping("guest.buyer@test.com")).unwrap();
    assert!(order.customer.is_none());
    assert_eq!(order.subtotal, Price::from_cents(2_499));
}

#[test]
fn test_rejected_checkout_keeps_the_cart() {
    let mut ctx = TestContext::new();

    let err = ctx.store.checkout(&shipping("buyer@test.com")).unwrap_err();
    assert_eq!(err, CheckoutError::EmptyCart);

    ctx.store.cart_mut().add_product(ProductId::new(2)).unwrap();
    let mut form = shipping("");
    form.city = "  ".to_string();
    let Err(CheckoutError::InvalidForm(fields)) = ctx.store.checkout(&form) else {
        panic!("expected field errors");
    };
    assert_eq!(fields.get("email"), Some("Email is required"));
    assert_eq!(fields.get("city"), Some("City is required"));
    assert_eq!(ctx.store.cart().quantity_of(ProductId::new(2)), 1);
}

#[test]
fn test_checkout_accepts_any_non_empty_email() {
    let mut ctx = TestContext::new();
    ctx.store.cart_mut().add_product(ProductId::new(2)).unwrap();

    let order = ctx.store.checkout(&shipping("buyer@localhost")).unwrap();
    assert_eq!(order.shipping.email, "buyer@localhost");
    assert!(ctx.store.cart().is_empty());
}

#[test]
fn test_out_of_stock_product_cannot_be_added() {
    let mut ctx = TestContext::new();
    let err = ctx.store.cart_mut().add_product(ProductId::new(7)).unwrap_err();
    assert_eq!(err, CartError::OutOfStock(ProductId::new(7)));
    assert!(ctx.store.cart().is_empty());

    let toast = AppError::from(err).notification();
    assert_eq!(toast.title, "Out of Stock");
}

#[test]
fn test_viewing_products_feeds_recently_viewed() {
    let mut ctx = TestContext::new();
    for id in [4, 2, 4] {
        ctx.store.view_product(ProductId::new(id)).unwrap();
    }
    assert_eq!(
        ctx.store.recently_viewed().ids(),
        &[ProductId::new(4), ProductId::new(2)]
    );

    let err = ctx.store.view_product(ProductId::new(999)).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_review_requires_sign_in_then_publishes() {
    use testmart_storefront::models::ReviewDraft;
    use testmart_storefront::services::reviews::ReviewError;

    let mut ctx = TestContext::new();
    let draft = || ReviewDraft {
        product_id: ProductId::new(9),
        rating: 4,
        title: "Solid".to_string(),
        comment: "Does what it says.".to_string(),
        verified: false,
        images: Vec::new(),
    };

    assert_eq!(
        ctx.store.write_review(draft()).unwrap_err(),
        ReviewError::Unauthenticated
    );

    ctx.store
        .session_mut()
        .authenticate("admin@test.com", "admin123")
        .unwrap();
    let review = ctx.store.write_review(draft()).unwrap();
    assert_eq!(review.user_name, "Admin User");
    assert_eq!(review.helpful, 0);
}
