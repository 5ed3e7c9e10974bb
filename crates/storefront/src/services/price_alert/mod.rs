//! Price alert simulation.
//!
//! Visitors watch a product for a price below its current price. Nothing
//! real ever changes price: a [`PriceDropPolicy`] invents price movements
//! each time alerts are evaluated, and an alert whose simulated price reaches
//! its target is deactivated and logged to the price history.
//!
//! # Evaluation
//!
//! [`PriceAlertStore::check_alerts`] is one evaluation pass. The
//! [`PriceAlertMonitor`] runs passes on a fixed interval in the background
//! against a store shared through [`SharedAlerts`].

mod monitor;
mod policy;

use std::sync::{Arc, Mutex};

use chrono::{Days, Utc};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, instrument};

use testmart_core::{AlertId, Email, Price, ProductId};

pub use monitor::{MIN_INTERVAL, PriceAlertMonitor};
pub use policy::{PriceDropPolicy, RandomPriceDrop};

use crate::models::{PriceAlert, PricePoint, Product, TriggeredAlert};
use crate::services::rng;
use crate::storage::{Persisted, SharedStorage, keys};

/// Days of mock history generated for a fresh store.
pub const SEEDED_HISTORY_DAYS: u64 = 30;

/// Products with mock history, and the price the history varies around.
const SEEDED_BASE_PRICES: [(u32, i64); 5] = [
    (1, 29_999),
    (2, 24_999),
    (3, 19_999),
    (4, 14_999),
    (5, 9_999),
];

/// Price alert store shared with the background monitor.
pub type SharedAlerts = Arc<Mutex<PriceAlertStore>>;

/// Errors that can occur during price alert operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// Target is not below the current price.
    #[error("target price {target} must be lower than current price {current}")]
    InvalidTarget { target: Price, current: Price },

    /// The watcher already has an active alert for the product.
    #[error("an active alert already exists for product {product_id}")]
    DuplicateAlert { product_id: ProductId },

    /// No alert has this id.
    #[error("alert {0} not found")]
    AlertNotFound(AlertId),
}

/// Price alerts and the price history log.
#[derive(Debug)]
pub struct PriceAlertStore {
    alerts: Vec<PriceAlert>,
    history: Vec<PricePoint>,
    alerts_slot: Persisted<Vec<PriceAlert>>,
    history_slot: Persisted<Vec<PricePoint>>,
}

impl PriceAlertStore {
    /// Create the store, restoring persisted alerts and history.
    ///
    /// When no history is persisted, thirty days of mock history are
    /// generated for products 1-5 and saved. `rng_seed` makes that history
    /// reproducible.
    #[must_use]
    pub fn new(storage: SharedStorage, rng_seed: Option<u64>) -> Self {
        let alerts_slot = Persisted::new(storage.clone(), keys::PRICE_ALERTS);
        let history_slot = Persisted::new(storage, keys::PRICE_HISTORY);

        let alerts: Vec<PriceAlert> = alerts_slot.load().unwrap_or_default();
        let history = history_slot.load().unwrap_or_else(|| {
            let history = seed_history(rng_seed);
            history_slot.save(&history);
            history
        });
        debug!(alerts = alerts.len(), history = history.len(), "Loaded price alerts");

        Self {
            alerts,
            history,
            alerts_slot,
            history_slot,
        }
    }

    /// Wrap the store for sharing with a [`PriceAlertMonitor`].
    #[must_use]
    pub fn into_shared(self) -> SharedAlerts {
        Arc::new(Mutex::new(self))
    }

    /// Watch a product for a drop to `target` or below.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::InvalidTarget` when `target` is not below the
    /// product's current price and `AlertError::DuplicateAlert` when `email`
    /// already has an active alert for the product.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn create_alert(
        &mut self,
        product: &Product,
        target: Price,
        email: Email,
    ) -> Result<PriceAlert, AlertError> {
        if target >= product.price {
            return Err(AlertError::InvalidTarget {
                target,
                current: product.price,
            });
        }

        let duplicate = self
            .alerts
            .iter()
            .any(|a| a.is_active && a.product_id == product.id && a.email == email);
        if duplicate {
            return Err(AlertError::DuplicateAlert {
                product_id: product.id,
            });
        }

        let alert = PriceAlert {
            id: AlertId::generate(),
            product_id: product.id,
            product_name: product.name.clone(),
            target_price: target,
            current_price: product.price,
            email,
            is_active: true,
            created_at: Utc::now(),
            triggered_at: None,
        };
        self.alerts.push(alert.clone());
        self.alerts_slot.save(&self.alerts);
        info!(alert_id = %alert.id, target = %target, "Price alert created");

        Ok(alert)
    }

    /// Delete an alert, active or not.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::AlertNotFound` for unknown ids.
    pub fn remove_alert(&mut self, id: AlertId) -> Result<(), AlertError> {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        if self.alerts.len() == before {
            return Err(AlertError::AlertNotFound(id));
        }
        self.alerts_slot.save(&self.alerts);
        info!(alert_id = %id, "Price alert removed");
        Ok(())
    }

    /// Every alert, including triggered ones, in creation order.
    #[must_use]
    pub fn alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    /// Alerts that have not yet triggered.
    pub fn active_alerts(&self) -> impl Iterator<Item = &PriceAlert> {
        self.alerts.iter().filter(|a| a.is_active)
    }

    /// History for one product, oldest first.
    #[must_use]
    pub fn price_history(&self, product_id: ProductId) -> Vec<PricePoint> {
        let mut points: Vec<PricePoint> = self
            .history
            .iter()
            .filter(|p| p.product_id == product_id)
            .cloned()
            .collect();
        points.sort_by_key(|p| p.date);
        points
    }

    /// Run one evaluation pass and return the alerts that fired.
    ///
    /// Each active alert asks `policy` for a simulated price. A price at or
    /// below the target deactivates the alert, stamps its trigger time and
    /// appends the price to the history.
    pub fn check_alerts(&mut self, policy: &mut dyn PriceDropPolicy) -> Vec<TriggeredAlert> {
        let now = Utc::now();
        let today = now.date_naive();
        let mut triggered = Vec::new();

        for alert in self.alerts.iter_mut().filter(|a| a.is_active) {
            let Some(new_price) = policy.simulate(alert) else {
                continue;
            };
            if new_price > alert.target_price {
                continue;
            }

            alert.is_active = false;
            alert.triggered_at = Some(now);
            self.history.push(PricePoint {
                product_id: alert.product_id,
                price: new_price,
                date: today,
            });
            info!(
                alert_id = %alert.id,
                product_id = %alert.product_id,
                new_price = %new_price,
                "Price alert triggered"
            );
            triggered.push(TriggeredAlert {
                alert_id: alert.id,
                product_id: alert.product_id,
                product_name: alert.product_name.clone(),
                email: alert.email.clone(),
                new_price,
                previous_price: alert.current_price,
                triggered_at: now,
            });
        }

        if !triggered.is_empty() {
            self.alerts_slot.save(&self.alerts);
            self.history_slot.save(&self.history);
        }
        triggered
    }
}

fn seed_history(seed: Option<u64>) -> Vec<PricePoint> {
    let mut rng = rng::seeded(seed);
    let today = Utc::now().date_naive();
    let mut history = Vec::with_capacity(SEEDED_BASE_PRICES.len() * 30);

    for (product_id, base_cents) in SEEDED_BASE_PRICES {
        let spread = base_cents / 10;
        for days_ago in (0..SEEDED_HISTORY_DAYS).rev() {
            let Some(date) = today.checked_sub_days(Days::new(days_ago)) else {
                continue;
            };
            let cents = base_cents + rng.random_range(-spread..=spread);
            history.push(PricePoint {
                product_id: ProductId::new(product_id),
                price: Price::from_cents(cents),
                date,
            });
        }
    }
    history
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::storage::MemoryStorage;

    fn store() -> PriceAlertStore {
        PriceAlertStore::new(MemoryStorage::shared(), Some(1))
    }

    fn product(id: u32) -> &'static Product {
        catalog::product(ProductId::new(id)).unwrap()
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[test]
    fn test_seeded_history() {
        let store = store();
        let history = store.price_history(ProductId::new(1));
        assert_eq!(history.len(), 30);
        assert!(history.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(history.last().unwrap().date, Utc::now().date_naive());
        for point in &history {
            assert!(point.price >= Price::from_cents(26_999));
            assert!(point.price <= Price::from_cents(32_999));
        }
        assert!(store.price_history(ProductId::new(6)).is_empty());
    }

    #[test]
    fn test_create_alert_rejects_target_at_or_above_price() {
        let mut store = store();
        let headphones = product(1);
        let err = store
            .create_alert(headphones, headphones.price, email("buyer@test.com"))
            .unwrap_err();
        assert!(matches!(err, AlertError::InvalidTarget { .. }));
        assert!(store.alerts().is_empty());
    }

    #[test]
    fn test_duplicate_active_alert() {
        let mut store = store();
        let watch = product(2);
        store
            .create_alert(watch, Price::from_cents(20_000), email("buyer@test.com"))
            .unwrap();
        assert_eq!(
            store
                .create_alert(watch, Price::from_cents(19_000), email("buyer@test.com"))
                .unwrap_err(),
            AlertError::DuplicateAlert {
                product_id: watch.id
            }
        );
        // A different watcher may watch the same product
        store
            .create_alert(watch, Price::from_cents(19_000), email("guest@test.com"))
            .unwrap();
        assert_eq!(store.active_alerts().count(), 2);
    }

    #[test]
    fn test_check_alerts_triggers_at_or_below_target() {
        let mut store = store();
        let alert = store
            .create_alert(product(3), Price::from_cents(80_000), email("buyer@test.com"))
            .unwrap();

        let mut no_move = |_: &PriceAlert| -> Option<Price> { None };
        assert!(store.check_alerts(&mut no_move).is_empty());

        let mut above = |a: &PriceAlert| Some(a.target_price + Price::from_cents(1));
        assert!(store.check_alerts(&mut above).is_empty());

        let mut exact = |a: &PriceAlert| Some(a.target_price);
        let fired = store.check_alerts(&mut exact);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].alert_id, alert.id);
        assert_eq!(fired[0].previous_price, Price::from_cents(89_999));

        let stored = &store.alerts()[0];
        assert!(!stored.is_active);
        assert!(stored.triggered_at.is_some());
        let history = store.price_history(ProductId::new(3));
        assert_eq!(history.last().unwrap().price, Price::from_cents(80_000));

        // Triggered alerts are not evaluated again
        assert!(store.check_alerts(&mut exact).is_empty());
    }

    #[test]
    fn test_triggered_alert_frees_duplicate_slot() {
        let mut store = store();
        let mouse = product(8);
        store
            .create_alert(mouse, Price::from_cents(3_000), email("buyer@test.com"))
            .unwrap();
        store.check_alerts(&mut |a: &PriceAlert| Some(a.target_price));
        assert!(
            store
                .create_alert(mouse, Price::from_cents(2_500), email("buyer@test.com"))
                .is_ok()
        );
    }

    #[test]
    fn test_remove_alert() {
        let mut store = store();
        let alert = store
            .create_alert(product(4), Price::from_cents(30_000), email("admin@test.com"))
            .unwrap();
        store.remove_alert(alert.id).unwrap();
        assert_eq!(
            store.remove_alert(alert.id),
            Err(AlertError::AlertNotFound(alert.id))
        );
    }

    #[test]
    fn test_alerts_and_history_persist() {
        let storage = MemoryStorage::shared();
        let mut store = PriceAlertStore::new(storage.clone(), Some(3));
        store
            .create_alert(product(5), Price::from_cents(12_000), email("buyer@test.com"))
            .unwrap();
        let history = store.price_history(ProductId::new(5));

        let restored = PriceAlertStore::new(storage, Some(4));
        assert_eq!(restored.alerts(), store.alerts());
        assert_eq!(restored.price_history(ProductId::new(5)), history);
    }
}
