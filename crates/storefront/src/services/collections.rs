//! Wishlist and comparison stores.
//!
//! Both are ordered sets of product snapshots keyed by product id. The
//! comparison set is capped at [`COMPARE_LIMIT`] products.

use thiserror::Error;
use tracing::{debug, info};

use testmart_core::ProductId;

use crate::models::Product;
use crate::storage::{Persisted, SharedStorage, keys};

/// Maximum number of products that can be compared at once.
pub const COMPARE_LIMIT: usize = 4;

/// Errors that can occur when adding to a product collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// The product is already a member.
    #[error("product {0} is already in the {1}")]
    AlreadyPresent(ProductId, &'static str),

    /// The collection is full.
    #[error("cannot hold more than {0} products")]
    LimitReached(usize),
}

/// Result of [`WishlistStore::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

#[derive(Debug)]
struct ProductSet {
    name: &'static str,
    items: Vec<Product>,
    limit: Option<usize>,
    slot: Persisted<Vec<Product>>,
}

impl ProductSet {
    fn load(storage: SharedStorage, key: &'static str, name: &'static str, limit: Option<usize>) -> Self {
        let slot = Persisted::new(storage, key);
        let items: Vec<Product> = slot.load().unwrap_or_default();
        debug!(collection = name, items = items.len(), "Loaded collection");
        Self {
            name,
            items,
            limit,
            slot,
        }
    }

    fn add(&mut self, product: &Product) -> Result<(), CollectionError> {
        if let Some(limit) = self.limit
            && self.items.len() >= limit
        {
            return Err(CollectionError::LimitReached(limit));
        }
        if self.contains(product.id) {
            return Err(CollectionError::AlreadyPresent(product.id, self.name));
        }

        self.items.push(product.clone());
        self.slot.save(&self.items);
        info!(collection = self.name, product_id = %product.id, "Added to collection");
        Ok(())
    }

    fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.slot.save(&self.items);
            info!(collection = self.name, product_id = %id, "Removed from collection");
        }
        removed
    }

    fn clear(&mut self) {
        self.items.clear();
        self.slot.remove();
    }

    fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|p| p.id == id)
    }
}

/// Saved-for-later products.
#[derive(Debug)]
pub struct WishlistStore(ProductSet);

impl WishlistStore {
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self(ProductSet::load(storage, keys::WISHLIST, "wishlist", None))
    }

    /// # Errors
    ///
    /// Returns `CollectionError::AlreadyPresent` if the product is already
    /// wishlisted.
    pub fn add(&mut self, product: &Product) -> Result<(), CollectionError> {
        self.0.add(product)
    }

    /// Remove a product, returning whether it was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        self.0.remove(id)
    }

    /// Add the product if absent, otherwise remove it.
    pub fn toggle(&mut self, product: &Product) -> Toggled {
        if self.0.remove(product.id) {
            Toggled::Removed
        } else {
            // Cannot fail: no limit, and the product was just confirmed absent
            let _ = self.0.add(product);
            Toggled::Added
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.0.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.items.is_empty()
    }
}

/// Products selected for side-by-side comparison.
#[derive(Debug)]
pub struct ComparisonStore(ProductSet);

impl ComparisonStore {
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        Self(ProductSet::load(
            storage,
            keys::COMPARE_LIST,
            "comparison",
            Some(COMPARE_LIMIT),
        ))
    }

    /// Add a product to the comparison.
    ///
    /// The limit is checked before membership, so a full comparison reports
    /// `LimitReached` even for a product it already holds.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::LimitReached` when [`COMPARE_LIMIT`] products
    /// are already held and `CollectionError::AlreadyPresent` for a member.
    pub fn add(&mut self, product: &Product) -> Result<(), CollectionError> {
        self.0.add(product)
    }

    /// Remove a product, returning whether it was present.
    pub fn remove(&mut self, id: ProductId) -> bool {
        self.0.remove(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.0.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.items.is_empty()
    }

    /// Whether another product can be added.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= COMPARE_LIMIT
    }
}
