//! Background price alert evaluation.

use std::sync::PoisonError;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{PriceDropPolicy, SharedAlerts};
use crate::models::TriggeredAlert;

/// Shortest evaluation interval; shorter requests are raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Periodically evaluates a shared [`super::PriceAlertStore`].
///
/// The first pass runs one full interval after spawning. Triggered alerts are
/// delivered through [`PriceAlertMonitor::next_triggered`]. Dropping the
/// monitor stops the task.
#[derive(Debug)]
pub struct PriceAlertMonitor {
    handle: JoinHandle<()>,
    triggered: mpsc::UnboundedReceiver<TriggeredAlert>,
}

impl PriceAlertMonitor {
    /// Spawn the monitor on the current tokio runtime.
    ///
    /// Intervals below [`MIN_INTERVAL`] are clamped to it.
    #[must_use]
    pub fn spawn<P>(alerts: SharedAlerts, mut policy: P, interval: Duration) -> Self
    where
        P: PriceDropPolicy + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let fired = {
                    let mut store = alerts.lock().unwrap_or_else(PoisonError::into_inner);
                    store.check_alerts(&mut policy)
                };
                debug!(fired = fired.len(), "Evaluated price alerts");

                for alert in fired {
                    if tx.send(alert).is_err() {
                        debug!("Price alert receiver closed");
                        return;
                    }
                }
            }
        });

        info!(interval_ms = interval.as_millis(), "Price alert monitor started");
        Self {
            handle,
            triggered: rx,
        }
    }

    /// Wait for the next triggered alert.
    ///
    /// Returns `None` once the monitor task has stopped.
    pub async fn next_triggered(&mut self) -> Option<TriggeredAlert> {
        self.triggered.recv().await
    }

    /// A triggered alert that is already waiting, without blocking.
    pub fn try_next_triggered(&mut self) -> Option<TriggeredAlert> {
        self.triggered.try_recv().ok()
    }

    /// Stop evaluating.
    pub fn stop(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for PriceAlertMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
