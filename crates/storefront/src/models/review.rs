//! Product review types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use testmart_core::{AccountId, ProductId, ReviewId};

/// A product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    /// Author account.
    pub user_id: AccountId,
    /// Author display name at the time of writing.
    pub user_name: String,
    /// Stars, 1 through 5.
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub date: NaiveDate,
    /// Verified purchase badge.
    pub verified: bool,
    /// Helpful votes. Every vote counts, there is no per-viewer de-duplication.
    pub helpful: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// User input for a new review; author, date and votes are filled in by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub product_id: ProductId,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub verified: bool,
    pub images: Vec<String>,
}

/// Review counts per star value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RatingDistribution([u32; 5]);

impl RatingDistribution {
    /// Count one review; ratings outside 1-5 are ignored.
    pub fn record(&mut self, rating: u8) {
        if let Some(slot) = usize::from(rating)
            .checked_sub(1)
            .and_then(|i| self.0.get_mut(i))
        {
            *slot += 1;
        }
    }

    /// Number of reviews with exactly `stars` stars.
    #[must_use]
    pub fn count(&self, stars: u8) -> u32 {
        usize::from(stars)
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Total reviews counted.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// `(stars, count)` pairs from five stars down to one.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=5u8).rev().map(|stars| (stars, self.count(stars)))
    }
}
