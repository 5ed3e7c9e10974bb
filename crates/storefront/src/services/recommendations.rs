//! Product recommendations and the recently viewed list.

use rand::Rng;
use rand::rngs::StdRng;

use testmart_core::ProductId;

use crate::models::{CartLine, Product};
use crate::services::rng;
use crate::storage::{Persisted, SharedStorage, keys};

/// Number of viewed product ids kept.
pub const RECENTLY_VIEWED_LIMIT: usize = 10;

/// Number of recently viewed products shown.
pub const RECENTLY_VIEWED_SHOWN: usize = 4;

const SIMILAR_LIMIT: usize = 4;
const TRENDING_LIMIT: usize = 6;
const PERSONALIZED_LIMIT: usize = 4;
const BOUGHT_TOGETHER_LIMIT: usize = 3;

/// Chance an unrelated product is shown as frequently bought together.
const UNRELATED_ADMIT_PROBABILITY: f64 = 0.3;

/// Product ids the visitor opened, most recent first.
#[derive(Debug)]
pub struct RecentlyViewed {
    ids: Vec<ProductId>,
    slot: Persisted<Vec<ProductId>>,
}

impl RecentlyViewed {
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        let slot = Persisted::new(storage, keys::RECENTLY_VIEWED);
        let ids = slot.load().unwrap_or_default();
        Self { ids, slot }
    }

    /// Move `id` to the front of the list.
    pub fn track_view(&mut self, id: ProductId) {
        self.ids.retain(|viewed| *viewed != id);
        self.ids.insert(0, id);
        self.ids.truncate(RECENTLY_VIEWED_LIMIT);
        self.slot.save(&self.ids);
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// The first few viewed ids that still resolve to a product.
    #[must_use]
    pub fn products<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        self.ids
            .iter()
            .filter_map(|id| catalog.iter().find(|p| p.id == *id))
            .take(RECENTLY_VIEWED_SHOWN)
            .collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.slot.remove();
    }
}

/// Decides whether an unrelated product joins the frequently bought together
/// list.
pub trait AdmitPolicy {
    fn admit(&mut self, product: &Product) -> bool;
}

impl<F> AdmitPolicy for F
where
    F: FnMut(&Product) -> bool,
{
    fn admit(&mut self, product: &Product) -> bool {
        self(product)
    }
}

/// Admits each unrelated product with a fixed probability.
#[derive(Debug)]
pub struct RandomAdmit {
    rng: StdRng,
}

impl RandomAdmit {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: rng::seeded(seed),
        }
    }
}

impl AdmitPolicy for RandomAdmit {
    fn admit(&mut self, _product: &Product) -> bool {
        self.rng.random_bool(UNRELATED_ADMIT_PROBABILITY)
    }
}

fn by_rating_desc(products: &mut [&Product]) {
    products.sort_by(|a, b| b.rating.cmp(&a.rating));
}

/// Highest rated products in the same category, excluding `current`.
#[must_use]
pub fn similar<'a>(catalog: &'a [Product], current: &Product) -> Vec<&'a Product> {
    let mut found: Vec<&Product> = catalog
        .iter()
        .filter(|p| p.id != current.id && p.category == current.category)
        .collect();
    by_rating_desc(&mut found);
    found.truncate(SIMILAR_LIMIT);
    found
}

/// Highest rated in-stock products rated 4.5 or better.
#[must_use]
pub fn trending(catalog: &[Product]) -> Vec<&Product> {
    let threshold = rust_decimal::Decimal::new(45, 1);
    let mut found: Vec<&Product> = catalog
        .iter()
        .filter(|p| p.in_stock && p.rating >= threshold)
        .collect();
    by_rating_desc(&mut found);
    found.truncate(TRENDING_LIMIT);
    found
}

/// Highest rated products from the categories already in the cart, excluding
/// products already in it.
#[must_use]
pub fn personalized<'a>(catalog: &'a [Product], cart: &[CartLine]) -> Vec<&'a Product> {
    let categories: Vec<&str> = cart
        .iter()
        .filter_map(|line| catalog.iter().find(|p| p.id == line.id))
        .map(|p| p.category.as_str())
        .collect();
    let mut found: Vec<&Product> = catalog
        .iter()
        .filter(|p| categories.contains(&p.category.as_str()))
        .filter(|p| !cart.iter().any(|line| line.id == p.id))
        .collect();
    by_rating_desc(&mut found);
    found.truncate(PERSONALIZED_LIMIT);
    found
}

/// Same-category products plus whatever `policy` admits, in catalog order.
pub fn bought_together<'a>(
    catalog: &'a [Product],
    current: &Product,
    policy: &mut dyn AdmitPolicy,
) -> Vec<&'a Product> {
    catalog
        .iter()
        .filter(|p| p.id != current.id)
        .filter(|p| p.category == current.category || policy.admit(p))
        .take(BOUGHT_TOGETHER_LIMIT)
        .collect()
}
