//! Order confirmation types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use testmart_core::{DiscountRate, Email, Price};

use super::cart::CartLine;

/// Where a mock order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    /// Required but not format-checked.
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Result of a successful checkout, shown on the thank-you page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// `TM` followed by six digits.
    pub order_number: String,
    pub items: Vec<CartLine>,
    pub subtotal: Price,
    pub discount: DiscountRate,
    pub total: Price,
    pub shipping: ShippingAddress,
    /// Signed-in account email, if the buyer was signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Email>,
    pub placed_at: DateTime<Utc>,
}
