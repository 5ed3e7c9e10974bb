//! Storefront stores and the logic behind each page.
//!
//! # Services
//!
//! - `session` - Mock sign-in against the fixed account table
//! - `cart` - Cart lines, quantities and coupon discounts
//! - `collections` - Wishlist and the four-slot comparison list
//! - `price_alert` - Price alerts with a simulated background price feed
//! - `reviews` - Product reviews, helpful votes and rating aggregates
//! - `search` - Filtering, sorting, suggestions and search history
//! - `recommendations` - Recently viewed, similar, trending and bundle picks
//! - `checkout` - Turns the cart into an order confirmation
//! - `support` - Support chat with canned, delayed bot replies

pub mod cart;
pub mod checkout;
pub mod collections;
pub mod price_alert;
pub mod recommendations;
pub mod reviews;
mod rng;
pub mod search;
pub mod session;
pub mod support;
