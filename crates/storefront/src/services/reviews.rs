//! Product review store.

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use testmart_core::{ProductId, ReviewId};

use crate::models::{Account, RatingDistribution, Review, ReviewDraft};
use crate::storage::{Persisted, SharedStorage, keys};

/// Reviews present before anyone has written one.
const MOCK_REVIEWS: &str = include_str!("../../data/mock_reviews.json");

/// Errors that can occur during review operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Only signed-in accounts may write reviews.
    #[error("must be signed in to write a review")]
    Unauthenticated,

    /// The author already reviewed this product.
    #[error("product {0} has already been reviewed by this account")]
    DuplicateReview(ProductId),

    /// Rating outside 1-5 stars.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// No review has this id.
    #[error("review {0} not found")]
    ReviewNotFound(ReviewId),
}

/// All product reviews, newest first.
#[derive(Debug)]
pub struct ReviewStore {
    reviews: Vec<Review>,
    slot: Persisted<Vec<Review>>,
}

impl ReviewStore {
    /// Create the store, restoring persisted reviews or seeding the mock ones.
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        let slot = Persisted::new(storage, keys::PRODUCT_REVIEWS);
        let reviews = slot.load().unwrap_or_else(mock_reviews);
        debug!(reviews = reviews.len(), "Loaded reviews");
        Self { reviews, slot }
    }

    /// Publish a review as `author`.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Unauthenticated` without an author,
    /// `ReviewError::InvalidRating` for ratings outside 1-5 and
    /// `ReviewError::DuplicateReview` if the author already reviewed the
    /// product.
    #[instrument(skip(self, author, draft), fields(product_id = %draft.product_id))]
    pub fn add_review(
        &mut self,
        author: Option<&Account>,
        draft: ReviewDraft,
    ) -> Result<Review, ReviewError> {
        let author = author.ok_or(ReviewError::Unauthenticated)?;

        if !(1..=5).contains(&draft.rating) {
            return Err(ReviewError::InvalidRating(draft.rating));
        }

        let duplicate = self
            .reviews
            .iter()
            .any(|r| r.product_id == draft.product_id && r.user_id == author.id);
        if duplicate {
            return Err(ReviewError::DuplicateReview(draft.product_id));
        }

        let review = Review {
            id: ReviewId::generate(),
            product_id: draft.product_id,
            user_id: author.id,
            user_name: author.name.clone(),
            rating: draft.rating,
            title: draft.title,
            comment: draft.comment,
            date: Utc::now().date_naive(),
            verified: draft.verified,
            helpful: 0,
            images: draft.images,
        };
        info!(review_id = %review.id, rating = review.rating, "Review added");

        self.reviews.insert(0, review.clone());
        self.slot.save(&self.reviews);
        Ok(review)
    }

    /// Count a helpful vote, returning the new total.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::ReviewNotFound` for unknown ids.
    pub fn mark_helpful(&mut self, id: ReviewId) -> Result<u32, ReviewError> {
        let review = self
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ReviewError::ReviewNotFound(id))?;
        review.helpful += 1;
        let helpful = review.helpful;
        self.slot.save(&self.reviews);
        debug!(review_id = %id, helpful, "Marked review helpful");
        Ok(helpful)
    }

    /// Every review in storage order.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// A product's reviews, newest date first.
    #[must_use]
    pub fn product_reviews(&self, product_id: ProductId) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .collect();
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        reviews
    }

    /// Mean rating rounded to one decimal place, zero without reviews.
    #[must_use]
    pub fn average_rating(&self, product_id: ProductId) -> Decimal {
        let (sum, count) = self
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .fold((0u32, 0u32), |(sum, count), r| {
                (sum + u32::from(r.rating), count + 1)
            });
        if count == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(sum) / Decimal::from(count))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Review counts per star value.
    #[must_use]
    pub fn rating_distribution(&self, product_id: ProductId) -> RatingDistribution {
        let mut distribution = RatingDistribution::default();
        for review in self.reviews.iter().filter(|r| r.product_id == product_id) {
            distribution.record(review.rating);
        }
        distribution
    }
}

fn mock_reviews() -> Vec<Review> {
    serde_json::from_str(MOCK_REVIEWS).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to parse mock reviews");
        Vec::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use testmart_core::{AccountId, AccountRole, Email};

    use super::*;
    use crate::storage::MemoryStorage;

    fn account(id: u32, name: &str) -> Account {
        Account {
            id: AccountId::new(id),
            email: Email::parse(&format!("user{id}@test.com")).unwrap(),
            name: name.to_string(),
            role: AccountRole::Buyer,
            is_locked: false,
        }
    }

    fn draft(product: u32, rating: u8) -> ReviewDraft {
        ReviewDraft {
            product_id: ProductId::new(product),
            rating,
            title: "Solid".to_string(),
            comment: "Does what it says.".to_string(),
            verified: false,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_mock_reviews_seeded() {
        let store = ReviewStore::new(MemoryStorage::shared());
        assert_eq!(store.reviews().len(), 3);

        let headphones = store.product_reviews(ProductId::new(1));
        assert_eq!(headphones.len(), 2);
        assert_eq!(headphones[0].title, "Excellent headphones!");
        assert_eq!(store.average_rating(ProductId::new(1)), Decimal::new(45, 1));
    }

    #[test]
    fn test_add_requires_author() {
        let mut store = ReviewStore::new(MemoryStorage::shared());
        assert_eq!(
            store.add_review(None, draft(4, 5)).unwrap_err(),
            ReviewError::Unauthenticated
        );
    }

    #[test]
    fn test_add_rejects_bad_rating() {
        let mut store = ReviewStore::new(MemoryStorage::shared());
        let author = account(9, "Tess");
        assert_eq!(
            store.add_review(Some(&author), draft(4, 0)).unwrap_err(),
            ReviewError::InvalidRating(0)
        );
        assert_eq!(
            store.add_review(Some(&author), draft(4, 6)).unwrap_err(),
            ReviewError::InvalidRating(6)
        );
    }

    #[test]
    fn test_duplicate_review_keeps_first() {
        let mut store = ReviewStore::new(MemoryStorage::shared());
        let author = account(9, "Tess");
        let review = store.add_review(Some(&author), draft(4, 2)).unwrap();
        assert_eq!(review.helpful, 0);
        assert_eq!(review.user_name, "Tess");

        assert_eq!(
            store.add_review(Some(&author), draft(4, 5)).unwrap_err(),
            ReviewError::DuplicateReview(ProductId::new(4))
        );
        assert_eq!(store.average_rating(ProductId::new(4)), Decimal::TWO);
    }

    #[test]
    fn test_new_review_is_newest() {
        let mut store = ReviewStore::new(MemoryStorage::shared());
        let author = account(9, "Tess");
        store.add_review(Some(&author), draft(1, 3)).unwrap();

        assert_eq!(store.reviews()[0].user_name, "Tess");
        assert_eq!(store.product_reviews(ProductId::new(1))[0].user_name, "Tess");
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let mut store = ReviewStore::new(MemoryStorage::shared());
        store.add_review(Some(&account(10, "A")), draft(6, 5)).unwrap();
        store.add_review(Some(&account(11, "B")), draft(6, 4)).unwrap();
        store.add_review(Some(&account(12, "C")), draft(6, 4)).unwrap();
        // 13 / 3 = 4.333...
        assert_eq!(store.average_rating(ProductId::new(6)), Decimal::new(43, 1));
        assert_eq!(store.average_rating(ProductId::new(7)), Decimal::ZERO);
    }

    #[test]
    fn test_rating_distribution() {
        let store = ReviewStore::new(MemoryStorage::shared());
        let distribution = store.rating_distribution(ProductId::new(1));
        assert_eq!(distribution.count(5), 1);
        assert_eq!(distribution.count(4), 1);
        assert_eq!(distribution.count(1), 0);
        assert_eq!(distribution.total(), 2);
    }

    #[test]
    fn test_mark_helpful() {
        let mut store = ReviewStore::new(MemoryStorage::shared());
        let id = store.reviews()[0].id;
        assert_eq!(store.mark_helpful(id).unwrap(), 13);
        assert_eq!(store.mark_helpful(id).unwrap(), 14);

        let missing = ReviewId::generate();
        assert_eq!(
            store.mark_helpful(missing),
            Err(ReviewError::ReviewNotFound(missing))
        );
    }

    #[test]
    fn test_reviews_persist() {
        let storage = MemoryStorage::shared();
        let mut store = ReviewStore::new(storage.clone());
        store
            .add_review(Some(&account(9, "Tess")), draft(2, 4))
            .unwrap();

        let restored = ReviewStore::new(storage);
        assert_eq!(restored.reviews(), store.reviews());
    }
}
