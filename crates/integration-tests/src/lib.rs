//! Integration tests for TestMart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p testmart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - Sign-in, cart, coupon and checkout across stores
//! - `persistence` - Store state surviving a reopen of file storage
//! - `store_properties` - Store invariants over a fresh storefront
//! - `price_alerts` - Background monitor with deterministic policies

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use testmart_storefront::Storefront;
use testmart_storefront::config::StorefrontConfig;
use testmart_storefront::storage::FileStorage;

/// A storefront backed by files in a temporary directory.
///
/// The directory is deleted when the context is dropped.
pub struct TestContext {
    dir: TempDir,
    pub store: Storefront,
}

impl TestContext {
    /// Open a fresh storefront in a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = open(dir.path());
        Self { dir, store }
    }

    /// Open a second storefront over the same files, as a page reload would.
    #[must_use]
    pub fn reopen(&self) -> Storefront {
        open(self.dir.path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration with defaults, a fixed seed and `data_dir` pointed at `dir`.
#[must_use]
pub fn config(dir: &Path) -> StorefrontConfig {
    let dir = dir.display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "TESTMART_DATA_DIR" => Some(dir.clone()),
        "TESTMART_RNG_SEED" => Some("7".to_string()),
        _ => None,
    })
    .unwrap_or_else(|e| panic!("test config: {e}"))
}

#[allow(clippy::expect_used)]
fn open(dir: &Path) -> Storefront {
    let storage = FileStorage::open(dir).expect("Failed to open file storage");
    Storefront::new(Arc::new(storage), config(dir))
}
