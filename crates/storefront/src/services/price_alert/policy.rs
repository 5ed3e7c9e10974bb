//! Price-drop simulation policies.

use rand::Rng;
use rand::rngs::StdRng;

use testmart_core::Price;

use crate::models::PriceAlert;
use crate::services::rng;

/// Largest simulated drop below the target, exclusive, in cents.
const MAX_DROP_CENTS: i64 = 1_000;

/// Decides whether an alert's product sees a simulated price change.
pub trait PriceDropPolicy: Send {
    /// The simulated new price for the alert's product, or `None` when the
    /// price did not move this round.
    fn simulate(&mut self, alert: &PriceAlert) -> Option<Price>;
}

impl<F> PriceDropPolicy for F
where
    F: FnMut(&PriceAlert) -> Option<Price> + Send,
{
    fn simulate(&mut self, alert: &PriceAlert) -> Option<Price> {
        self(alert)
    }
}

/// With probability `p`, drops the price to `target - uniform[0, $10.00)`.
#[derive(Debug)]
pub struct RandomPriceDrop {
    rng: StdRng,
    probability: f64,
}

impl RandomPriceDrop {
    /// Default chance per alert per evaluation.
    pub const DEFAULT_PROBABILITY: f64 = 0.1;

    /// Create a policy. The probability is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(probability: f64, seed: Option<u64>) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self {
            rng: rng::seeded(seed),
            probability,
        }
    }

    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for RandomPriceDrop {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBABILITY, None)
    }
}

impl PriceDropPolicy for RandomPriceDrop {
    fn simulate(&mut self, alert: &PriceAlert) -> Option<Price> {
        if !self.rng.random_bool(self.probability) {
            return None;
        }
        let drop = Price::from_cents(self.rng.random_range(0..MAX_DROP_CENTS));
        Some(alert.target_price.saturating_sub(drop))
    }
}
