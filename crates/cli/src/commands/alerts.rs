//! Price alert commands.

use std::sync::{MutexGuard, PoisonError};

use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use testmart_core::{AlertId, Email, Price, ProductId};
use testmart_storefront::forms::FieldErrors;
use testmart_storefront::models::{PriceAlert, PricePoint, TriggeredAlert};
use testmart_storefront::services::price_alert::PriceAlertStore;
use testmart_storefront::{AppError, Notification, Result, Storefront};

use super::product;
use crate::error::CliError;
use crate::output::{Output, Render, table};

#[derive(Debug, Subcommand)]
pub enum AlertAction {
    /// List every alert
    List,
    /// Watch a product for a lower price
    Create {
        id: ProductId,
        /// Target price in dollars; must be below the current price
        #[arg(short, long)]
        target: Decimal,
        /// Where to send the alert; defaults to the signed-in account
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Delete an alert
    Remove { id: AlertId },
    /// Show a product's price history
    History { id: ProductId },
    /// Evaluate alerts in the background and print each one that fires
    Watch {
        /// Stop after this many alerts have fired
        #[arg(short, long)]
        count: Option<usize>,
    },
}

fn lock(store: &Storefront) -> MutexGuard<'_, PriceAlertStore> {
    store.alerts().lock().unwrap_or_else(PoisonError::into_inner)
}

/// The alert email: explicit, or the signed-in account's.
fn alert_email(store: &Storefront, email: Option<&str>) -> Result<Email> {
    let mut errors = FieldErrors::new();
    match email {
        Some(raw) => match Email::parse(raw) {
            Ok(email) => return Ok(email),
            Err(_) => errors.push("email", "Please enter a valid email"),
        },
        None => match store.session().current() {
            Some(account) => return Ok(account.email.clone()),
            None => errors.push("email", "Email is required"),
        },
    }
    Err(AppError::InvalidInput(errors))
}

pub fn create(
    store: &Storefront,
    id: ProductId,
    target: Decimal,
    email: Option<&str>,
) -> Result<Notification> {
    let item = product(id)?;
    let email = alert_email(store, email)?;
    let alert = lock(store).create_alert(item, Price::new(target), email)?;
    Ok(Notification::success(
        "Price Alert Created",
        format!(
            "You'll be notified when {} drops to {}.",
            alert.product_name, alert.target_price
        ),
    ))
}

pub fn remove(store: &Storefront, id: AlertId) -> Result<Notification> {
    lock(store).remove_alert(id)?;
    Ok(Notification::success(
        "Alert Removed",
        "Price alert has been removed.",
    ))
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Alerts(pub Vec<PriceAlert>);

pub fn list(store: &Storefront) -> Alerts {
    Alerts(lock(store).alerts().to_vec())
}

impl Render for Alerts {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return "No price alerts.".to_string();
        }
        let mut t = table(["ID", "Product", "Target", "Was", "Email", "Status"]);
        for a in &self.0 {
            let status = match (a.is_active, a.triggered_at) {
                (true, _) => "Active".to_string(),
                (false, Some(at)) => format!("Triggered {}", at.format("%Y-%m-%d %H:%M")),
                (false, None) => "Inactive".to_string(),
            };
            t.add_row([
                a.id.to_string(),
                a.product_name.clone(),
                a.target_price.to_string(),
                a.current_price.to_string(),
                a.email.to_string(),
                status,
            ]);
        }
        t.to_string()
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct History(pub Vec<PricePoint>);

pub fn history(store: &Storefront, id: ProductId) -> History {
    History(lock(store).price_history(id))
}

impl Render for History {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return "No price history.".to_string();
        }
        let mut t = table(["Date", "Price"]);
        for point in &self.0 {
            t.add_row([point.date.to_string(), point.price.to_string()]);
        }
        t.to_string()
    }
}

impl Render for TriggeredAlert {
    fn render(&self) -> String {
        format!(
            "Price Alert Triggered! {} is now {} (was {})",
            self.product_name, self.new_price, self.previous_price
        )
    }
}

/// Run the monitor until `count` alerts fire or the process is interrupted.
pub async fn watch(
    store: &Storefront,
    count: Option<usize>,
    out: &Output,
) -> std::result::Result<(), CliError> {
    let mut monitor = store.watch_prices();
    let mut fired = 0usize;

    loop {
        if count.is_some_and(|limit| fired >= limit) {
            break;
        }
        tokio::select! {
            next = monitor.next_triggered() => {
                let Some(alert) = next else { break };
                out.emit(&alert)?;
                fired += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    monitor.stop();
    info!(fired, "Stopped watching price alerts");
    Ok(())
}
