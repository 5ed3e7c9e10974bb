//! Storefront state shared by every page.
//!
//! [`Storefront`] owns one instance of each store, all writing through the
//! same storage handle. Operations that need more than one store (checkout
//! reads the session and drains the cart, reviews need the signed-in author)
//! live here.

use std::sync::{Arc, PoisonError};

use tracing::{info, instrument};

use testmart_core::ProductId;

use crate::catalog;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::forms::ShippingForm;
use crate::models::{OrderConfirmation, Product, Review, ReviewDraft};
use crate::services::cart::CartStore;
use crate::services::checkout::{self, CheckoutError};
use crate::services::collections::{ComparisonStore, WishlistStore};
use crate::services::price_alert::{
    PriceAlertMonitor, PriceAlertStore, RandomPriceDrop, SharedAlerts,
};
use crate::services::recommendations::RecentlyViewed;
use crate::services::reviews::{ReviewError, ReviewStore};
use crate::services::search::SearchHistory;
use crate::services::session::SessionStore;
use crate::storage::{FileStorage, MemoryStorage, SharedStorage, StorageError, keys};

/// Every store, restored from one storage backend.
pub struct Storefront {
    config: StorefrontConfig,
    storage: SharedStorage,
    session: SessionStore,
    cart: CartStore,
    wishlist: WishlistStore,
    comparison: ComparisonStore,
    alerts: SharedAlerts,
    reviews: ReviewStore,
    search_history: SearchHistory,
    recently_viewed: RecentlyViewed,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Restore every store from `storage`.
    #[must_use]
    pub fn new(storage: SharedStorage, config: StorefrontConfig) -> Self {
        let alerts = PriceAlertStore::new(storage.clone(), config.rng_seed).into_shared();
        Self {
            session: SessionStore::new(storage.clone()),
            cart: CartStore::new(storage.clone()),
            wishlist: WishlistStore::new(storage.clone()),
            comparison: ComparisonStore::new(storage.clone()),
            alerts,
            reviews: ReviewStore::new(storage.clone()),
            search_history: SearchHistory::new(storage.clone()),
            recently_viewed: RecentlyViewed::new(storage.clone()),
            storage,
            config,
        }
    }

    /// Restore from file storage under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data directory cannot be created.
    pub fn open(config: StorefrontConfig) -> std::result::Result<Self, StorageError> {
        let storage = FileStorage::open(config.data_dir.clone())?;
        info!(data_dir = %config.data_dir.display(), "Opened storefront storage");
        Ok(Self::new(Arc::new(storage), config))
    }

    /// A storefront that forgets everything when dropped.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig) -> Self {
        Self::new(MemoryStorage::shared(), config)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> SharedStorage {
        self.storage.clone()
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn comparison(&self) -> &ComparisonStore {
        &self.comparison
    }

    pub const fn comparison_mut(&mut self) -> &mut ComparisonStore {
        &mut self.comparison
    }

    /// The price alert store, shared with any running monitor.
    #[must_use]
    pub const fn alerts(&self) -> &SharedAlerts {
        &self.alerts
    }

    #[must_use]
    pub const fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }

    pub const fn reviews_mut(&mut self) -> &mut ReviewStore {
        &mut self.reviews
    }

    #[must_use]
    pub const fn search_history(&self) -> &SearchHistory {
        &self.search_history
    }

    pub const fn search_history_mut(&mut self) -> &mut SearchHistory {
        &mut self.search_history
    }

    #[must_use]
    pub const fn recently_viewed(&self) -> &RecentlyViewed {
        &self.recently_viewed
    }

    pub const fn recently_viewed_mut(&mut self) -> &mut RecentlyViewed {
        &mut self.recently_viewed
    }

    // =========================================================================
    // Cross-store operations
    // =========================================================================

    /// Open a product page: look the product up and record the view.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an id outside the catalog.
    pub fn view_product(&mut self, id: ProductId) -> Result<&'static Product> {
        let product =
            catalog::product(id).ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
        self.recently_viewed.track_view(id);
        Ok(product)
    }

    /// Place an order for the cart as the signed-in account, if any.
    ///
    /// # Errors
    ///
    /// See [`checkout::place_order`].
    pub fn checkout(
        &mut self,
        form: &ShippingForm,
    ) -> std::result::Result<OrderConfirmation, CheckoutError> {
        checkout::place_order(&mut self.cart, form, self.session.current())
    }

    /// Publish a review as the signed-in account.
    ///
    /// # Errors
    ///
    /// See [`ReviewStore::add_review`].
    pub fn write_review(&mut self, draft: ReviewDraft) -> std::result::Result<Review, ReviewError> {
        self.reviews.add_review(self.session.current(), draft)
    }

    /// Start evaluating price alerts in the background with the configured
    /// interval, drop probability and seed.
    #[must_use]
    pub fn watch_prices(&self) -> PriceAlertMonitor {
        let policy = RandomPriceDrop::new(self.config.alert_probability, self.config.rng_seed);
        PriceAlertMonitor::spawn(self.alerts.clone(), policy, self.config.alert_interval)
    }

    /// Forget every persisted key and start over with fresh stores.
    ///
    /// The price alert store is replaced in place, so a running monitor
    /// keeps watching the fresh store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a key cannot be removed.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> std::result::Result<(), StorageError> {
        for key in keys::ALL {
            self.storage.remove_item(key)?;
        }

        self.session = SessionStore::new(self.storage.clone());
        self.cart = CartStore::new(self.storage.clone());
        self.wishlist = WishlistStore::new(self.storage.clone());
        self.comparison = ComparisonStore::new(self.storage.clone());
        self.reviews = ReviewStore::new(self.storage.clone());
        self.search_history = SearchHistory::new(self.storage.clone());
        self.recently_viewed = RecentlyViewed::new(self.storage.clone());
        let fresh = PriceAlertStore::new(self.storage.clone(), self.config.rng_seed);
        *self.alerts.lock().unwrap_or_else(PoisonError::into_inner) = fresh;

        info!("Storefront state reset");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use testmart_core::Price;

    use super::*;

    fn storefront() -> Storefront {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        Storefront::in_memory(config)
    }

    fn shipping() -> ShippingForm {
        ShippingForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            zip_code: "62701".into(),
            ..ShippingForm::default()
        }
    }

    #[test]
    fn test_state_survives_restore() {
        let mut store = storefront();
        store.session_mut().authenticate("buyer@test.com", "buyer123").unwrap();
        store.cart_mut().add_product(ProductId::new(2)).unwrap();

        let restored = Storefront::new(store.storage(), store.config().clone());
        assert!(restored.session().is_authenticated());
        assert_eq!(restored.cart().total_items(), 1);
    }

    #[test]
    fn test_checkout_records_signed_in_customer() {
        let mut store = storefront();
        store.session_mut().authenticate("buyer@test.com", "buyer123").unwrap();
        store.cart_mut().add_product(ProductId::new(5)).unwrap();

        let order = store.checkout(&shipping()).unwrap();
        assert_eq!(order.customer.unwrap().as_str(), "buyer@test.com");
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_write_review_requires_session() {
        let mut store = storefront();
        let draft = ReviewDraft {
            product_id: ProductId::new(7),
            rating: 4,
            title: "Solid".into(),
            comment: "Does the job.".into(),
            verified: false,
            images: Vec::new(),
        };

        assert_eq!(
            store.write_review(draft.clone()).unwrap_err(),
            ReviewError::Unauthenticated
        );

        store.session_mut().authenticate("guest@test.com", "guest123").unwrap();
        let review = store.write_review(draft).unwrap();
        assert_eq!(review.user_name, "Guest User");
    }

    #[test]
    fn test_view_product_tracks_history() {
        let mut store = storefront();
        store.view_product(ProductId::new(3)).unwrap();
        store.view_product(ProductId::new(8)).unwrap();
        assert_eq!(
            store.recently_viewed().ids(),
            &[ProductId::new(8), ProductId::new(3)]
        );
        assert!(matches!(
            store.view_product(ProductId::new(99)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = storefront();
        store.session_mut().authenticate("admin@test.com", "admin123").unwrap();
        store.cart_mut().add_product(ProductId::new(1)).unwrap();
        store.search_history_mut().record("laptop");
        {
            let product = catalog::product(ProductId::new(1)).unwrap();
            let email = testmart_core::Email::parse("a@b.co").unwrap();
            let mut alerts = store.alerts().lock().unwrap();
            alerts
                .create_alert(product, Price::from_cents(100), email)
                .unwrap();
        }

        store.reset().unwrap();

        assert!(!store.session().is_authenticated());
        assert!(store.cart().is_empty());
        assert!(store.search_history().entries().is_empty());
        assert!(store.alerts().lock().unwrap().alerts().is_empty());
    }
}
