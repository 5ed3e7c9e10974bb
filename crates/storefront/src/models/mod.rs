//! Domain models for the storefront stores.
//!
//! These are the records the stores hold in memory and persist as JSON
//! snapshots. Field names serialize in camelCase so persisted slices keep the
//! same shape the browser storefront writes.

pub mod account;
pub mod alert;
pub mod cart;
pub mod order;
pub mod product;
pub mod review;

pub use account::Account;
pub use alert::{PriceAlert, PricePoint, TriggeredAlert};
pub use cart::CartLine;
pub use order::{OrderConfirmation, ShippingAddress};
pub use product::Product;
pub use review::{RatingDistribution, Review, ReviewDraft};
