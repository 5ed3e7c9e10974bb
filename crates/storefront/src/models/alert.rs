//! Price alert and price history types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use testmart_core::{AlertId, Email, Price, ProductId};

/// A watch on a product price.
///
/// Alerts are deactivated, never deleted, when they trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub id: AlertId,
    pub product_id: ProductId,
    pub product_name: String,
    /// Notify when the price falls to or below this.
    pub target_price: Price,
    /// Product price when the alert was created.
    pub current_price: Price,
    /// Watcher to notify.
    pub email: Email,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

/// One entry of the price history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub product_id: ProductId,
    pub price: Price,
    pub date: NaiveDate,
}

/// An alert that fired during an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    pub alert_id: AlertId,
    pub product_id: ProductId,
    pub product_name: String,
    pub email: Email,
    /// Simulated price that fired the alert.
    pub new_price: Price,
    /// Price recorded when the alert was created.
    pub previous_price: Price,
    pub triggered_at: DateTime<Utc>,
}
