//! Special-product testing fixtures.
//!
//! Special products render an interactive element (frame, shadow root,
//! dialogs) in place of ordinary product content. Nothing is rendered here;
//! this module only describes what automation scripts can target on each
//! fixture and drives the timed popup schedule.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{self, Instant};
use tracing::debug;

use testmart_core::{ProductId, SpecialType};

use crate::models::Product;

/// Delays, measured from the moment the widget is started, at which the
/// timed popup widget raises its popups.
pub const TIMED_POPUP_SCHEDULE: [Duration; 3] = [
    Duration::from_secs(3),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// Number of stacked layers the modal popup widget opens.
pub const MODAL_LAYERS: u32 = 2;

/// A `data-testid` an automation script can target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    /// What the element is.
    pub role: &'static str,
    pub test_id: String,
}

impl Selector {
    fn new(role: &'static str, test_id: String) -> Self {
        Self { role, test_id }
    }

    /// CSS selector for the test id.
    #[must_use]
    pub fn css(&self) -> String {
        format!("[data-testid=\"{}\"]", self.test_id)
    }
}

/// Selectors a special product exposes, badge first. Empty for ordinary
/// products.
#[must_use]
pub fn selectors(product: &Product) -> Vec<Selector> {
    product
        .special_type
        .map(|kind| selectors_for(kind, product.id))
        .unwrap_or_default()
}

/// Selectors for a fixture of `kind` rendered by product `id`.
#[must_use]
pub fn selectors_for(kind: SpecialType, id: ProductId) -> Vec<Selector> {
    let mut out = vec![Selector::new("badge", format!("special-badge-{id}"))];
    match kind {
        SpecialType::Iframe => {
            out.push(Selector::new("frame", format!("iframe-content-{id}")));
        }
        SpecialType::ShadowDom => {
            out.push(Selector::new("shadow host", format!("shadow-host-{id}")));
            out.push(Selector::new("shadow content", format!("shadow-content-{id}")));
            out.push(Selector::new("shadow button", format!("shadow-button-{id}")));
        }
        SpecialType::InstantAlert => {
            out.push(Selector::new("trigger", format!("instant-alert-button-{id}")));
        }
        SpecialType::TimedPopup => {
            out.push(Selector::new("trigger", format!("start-timed-popups-{id}")));
        }
        SpecialType::ConfirmDialog => {
            out.push(Selector::new("trigger", format!("confirm-dialog-button-{id}")));
            out.push(Selector::new("result", format!("confirm-result-{id}")));
        }
        SpecialType::ModalPopup => {
            out.push(Selector::new("trigger", format!("open-modal-{id}")));
            for layer in 1..=MODAL_LAYERS {
                out.push(Selector::new("modal layer", format!("modal-layer-{id}-{layer}")));
            }
        }
    }
    out
}

/// Text of the browser alert the fixture raises when its button is clicked.
#[must_use]
pub const fn alert_text(kind: SpecialType) -> Option<&'static str> {
    match kind {
        SpecialType::Iframe => Some("Button clicked in iframe!"),
        SpecialType::ShadowDom => Some("Button clicked in Shadow DOM!"),
        SpecialType::InstantAlert => Some("Instant alert triggered!"),
        SpecialType::TimedPopup | SpecialType::ConfirmDialog | SpecialType::ModalPopup => None,
    }
}

/// One popup raised by the timed popup widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    /// 1-based position in the schedule.
    pub sequence: usize,
    pub after: Duration,
    pub message: String,
}

/// Raise every scheduled popup, calling `on_popup` as each one fires.
///
/// Each delay is measured from when this is called, not from the previous
/// popup.
pub async fn run_timed_popups<F>(mut on_popup: F)
where
    F: FnMut(Popup),
{
    let started = Instant::now();
    for (i, after) in TIMED_POPUP_SCHEDULE.into_iter().enumerate() {
        time::sleep_until(started + after).await;
        let popup = Popup {
            sequence: i + 1,
            after,
            message: format!("Popup after {} seconds!", after.as_secs()),
        };
        debug!(sequence = popup.sequence, "Timed popup");
        on_popup(popup);
    }
}
