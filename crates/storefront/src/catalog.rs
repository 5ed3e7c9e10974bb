//! Static catalog data compiled into the storefront.
//!
//! The product list and coupon table never change at runtime. Products 13-18
//! are special products that render interactive testing fixtures.

use std::sync::LazyLock;

use rust_decimal::Decimal;

use testmart_core::{DiscountRate, Price, ProductId, SpecialType};

use crate::models::Product;

/// Coupon codes and their discount in whole percent. Codes match exactly.
pub const COUPONS: &[(&str, u32)] = &[("SAVE10", 10), ("WELCOME20", 20), ("TEST50", 50)];

static PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(build_products);

/// Every catalog product in display order.
#[must_use]
pub fn products() -> &'static [Product] {
    &PRODUCTS
}

/// Look up a product by ID.
#[must_use]
pub fn product(id: ProductId) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Distinct categories in first-seen catalog order.
#[must_use]
pub fn categories() -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for product in products() {
        if !seen.contains(&product.category.as_str()) {
            seen.push(product.category.as_str());
        }
    }
    seen
}

/// Discount for a coupon code, `None` for unknown codes.
#[must_use]
pub fn coupon(code: &str) -> Option<DiscountRate> {
    COUPONS
        .iter()
        .find(|(known, _)| *known == code)
        .and_then(|(_, percent)| DiscountRate::from_percent(*percent).ok())
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: u32,
    name: &str,
    cents: i64,
    image: &str,
    rating_tenths: i64,
    category: &str,
    description: &str,
    in_stock: bool,
    special_type: Option<SpecialType>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_cents(cents),
        image: image.to_string(),
        rating: Decimal::new(rating_tenths, 1),
        category: category.to_string(),
        description: description.to_string(),
        in_stock,
        special_type,
    }
}

fn build_products() -> Vec<Product> {
    use SpecialType::{ConfirmDialog, Iframe, InstantAlert, ModalPopup, ShadowDom, TimedPopup};

    vec![
        entry(
            1,
            "Premium Wireless Headphones",
            29_999,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400",
            48,
            "Electronics",
            "High-quality wireless headphones with noise cancellation and premium sound quality.",
            true,
            None,
        ),
        entry(
            2,
            "Smart Fitness Watch",
            24_999,
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400",
            46,
            "Electronics",
            "Advanced fitness tracking with heart rate monitoring and GPS.",
            true,
            None,
        ),
        entry(
            3,
            "Professional Camera",
            89_999,
            "https://images.unsplash.com/photo-1502920917128-1aa500764cbd?w=400",
            49,
            "Electronics",
            "Professional DSLR camera perfect for photography enthusiasts.",
            true,
            None,
        ),
        entry(
            4,
            "Ergonomic Office Chair",
            39_999,
            "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=400",
            44,
            "Furniture",
            "Comfortable ergonomic chair designed for long working hours.",
            true,
            None,
        ),
        entry(
            5,
            "Gaming Mechanical Keyboard",
            15_999,
            "https://images.unsplash.com/photo-1541140532154-b024d705b90a?w=400",
            47,
            "Electronics",
            "RGB mechanical keyboard with tactile switches for gaming.",
            true,
            None,
        ),
        entry(
            6,
            "Bluetooth Speaker",
            7_999,
            "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=400",
            43,
            "Electronics",
            "Portable waterproof speaker with excellent sound quality.",
            true,
            None,
        ),
        entry(
            7,
            "Laptop Stand",
            4_999,
            "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=400",
            42,
            "Accessories",
            "Adjustable aluminum laptop stand for better ergonomics.",
            false,
            None,
        ),
        entry(
            8,
            "Wireless Mouse",
            3_999,
            "https://images.unsplash.com/photo-1527814050087-3793815479db?w=400",
            45,
            "Electronics",
            "Precision wireless mouse with long battery life.",
            true,
            None,
        ),
        entry(
            9,
            "Phone Case",
            2_499,
            "https://plus.unsplash.com/premium_photo-1705346738010-d480180032ba?w=400",
            40,
            "Accessories",
            "Protective phone case with premium materials.",
            true,
            None,
        ),
        entry(
            10,
            "USB-C Hub",
            6_999,
            "https://images.unsplash.com/photo-1625842268584-8f3296236761?w=400",
            46,
            "Accessories",
            "Multi-port USB-C hub with HDMI and fast charging.",
            true,
            None,
        ),
        entry(
            11,
            "Desk Lamp",
            8_999,
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400",
            44,
            "Furniture",
            "LED desk lamp with adjustable brightness and color temperature.",
            true,
            None,
        ),
        entry(
            12,
            "Coffee Mug",
            1_999,
            "https://images.unsplash.com/photo-1533776992670-a72f4c28235e?w=400",
            41,
            "Home",
            "Ceramic coffee mug with heat-resistant handle.",
            true,
            None,
        ),
        entry(
            13,
            "Interactive iframe Widget",
            19_999,
            "https://images.unsplash.com/photo-1539975611936-f0d1221cfd16?w=400",
            47,
            "Electronics",
            "Advanced widget with embedded iframe content for testing iframe interactions.",
            true,
            Some(Iframe),
        ),
        entry(
            14,
            "Shadow DOM Component",
            29_999,
            "https://images.unsplash.com/photo-1550745165-9bc0b252726f?w=400",
            48,
            "Electronics",
            "Special component using Shadow DOM for encapsulated testing scenarios.",
            true,
            Some(ShadowDom),
        ),
        entry(
            15,
            "Instant Alert Widget",
            19_999,
            "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400",
            45,
            "Electronics",
            "Testing widget that triggers immediate browser alerts on interaction.",
            true,
            Some(InstantAlert),
        ),
        entry(
            16,
            "Timed Popup Display",
            24_999,
            "https://images.unsplash.com/photo-1551650975-87deedd944c3?w=400",
            43,
            "Electronics",
            "Automated testing component with timed popups (3, 5, and 10 second delays).",
            true,
            Some(TimedPopup),
        ),
        entry(
            17,
            "Confirmation Dialog Tester",
            17_999,
            "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400",
            46,
            "Electronics",
            "Interactive component requiring user confirmation dialogs for testing automation.",
            true,
            Some(ConfirmDialog),
        ),
        entry(
            18,
            "Modal Popup System",
            32_999,
            "https://images.unsplash.com/photo-1607798748738-b15c40d33d57?w=400",
            47,
            "Electronics",
            "Complex modal system with multiple layers and user interaction requirements.",
            true,
            Some(ModalPopup),
        ),
    ]
}
