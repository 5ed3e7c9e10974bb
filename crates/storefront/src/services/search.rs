//! Catalog search, filtering and search history.
//!
//! Search is a linear scan over the static catalog: a case-insensitive
//! substring match on name, description and category, followed by the
//! filters and a stable sort.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use testmart_core::Price;

use crate::models::Product;
use crate::storage::{Persisted, SharedStorage, keys};

/// Queries shorter than this produce no suggestions.
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;

/// Number of queries kept in the search history.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

const MAX_PRODUCT_SUGGESTIONS: usize = 5;
const MAX_CATEGORY_SUGGESTIONS: usize = 3;

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Name matches first, catalog order otherwise.
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Rating,
    Name,
    /// Highest product id first.
    Newest,
}

impl SortOrder {
    pub const ALL: [Self; 6] = [
        Self::Relevance,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Rating,
        Self::Name,
        Self::Newest,
    ];

    /// Value used by the sort dropdown.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Newest => "newest",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| format!("invalid sort order: {s}"))
    }
}

/// Product list filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    /// Exact category, or every category when `None`.
    pub category: Option<String>,
    pub min_price: Price,
    pub max_price: Price,
    pub min_rating: Decimal,
    pub in_stock_only: bool,
    pub sort: SortOrder,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            category: None,
            min_price: Price::ZERO,
            max_price: Price::from_cents(100_000),
            min_rating: Decimal::ZERO,
            in_stock_only: false,
            sort: SortOrder::Relevance,
        }
    }
}

impl SearchFilters {
    fn admits(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| product.category == category)
            && product.price >= self.min_price
            && product.price <= self.max_price
            && product.rating >= self.min_rating
            && (!self.in_stock_only || product.in_stock)
    }
}

/// Search `products` and apply `filters`.
///
/// An empty query matches everything.
#[instrument(skip(products, filters), fields(sort = %filters.sort))]
pub fn search<'a>(products: &'a [Product], query: &str, filters: &SearchFilters) -> Vec<&'a Product> {
    let needle = query.to_lowercase();

    let mut results: Vec<&Product> = products
        .iter()
        .filter(|p| needle.is_empty() || matches_query(p, &needle))
        .filter(|p| filters.admits(p))
        .collect();

    match filters.sort {
        SortOrder::Relevance => {
            if !needle.is_empty() {
                results.sort_by_key(|p| !p.name_matches(&needle));
            }
        }
        SortOrder::PriceLow => results.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOrder::PriceHigh => results.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Rating => results.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortOrder::Name => results.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortOrder::Newest => results.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    debug!(results = results.len(), "Search complete");
    results
}

fn matches_query(product: &Product, needle: &str) -> bool {
    product.name_matches(needle)
        || product.description.to_lowercase().contains(needle)
        || product.category.to_lowercase().contains(needle)
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A type-ahead suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Suggestion {
    Product { text: String },
    Category { text: String, count: usize },
}

/// Type-ahead suggestions: up to five product names, then up to three
/// categories with their product counts.
#[must_use]
pub fn suggestions(products: &[Product], query: &str) -> Vec<Suggestion> {
    if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut out: Vec<Suggestion> = products
        .iter()
        .filter(|p| p.name_matches(&needle))
        .take(MAX_PRODUCT_SUGGESTIONS)
        .map(|p| Suggestion::Product {
            text: p.name.clone(),
        })
        .collect();

    let mut categories: Vec<&str> = Vec::new();
    for product in products {
        if !categories.contains(&product.category.as_str()) {
            categories.push(&product.category);
        }
    }
    out.extend(
        categories
            .into_iter()
            .filter(|c| c.to_lowercase().contains(&needle))
            .take(MAX_CATEGORY_SUGGESTIONS)
            .map(|c| Suggestion::Category {
                text: c.to_string(),
                count: products.iter().filter(|p| p.category == c).count(),
            }),
    );
    out
}

/// Recent distinct search queries, newest first.
#[derive(Debug)]
pub struct SearchHistory {
    entries: Vec<String>,
    slot: Persisted<Vec<String>>,
}

impl SearchHistory {
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        let slot = Persisted::new(storage, keys::SEARCH_HISTORY);
        let entries = slot.load().unwrap_or_default();
        Self { entries, slot }
    }

    /// Remember a query. Blank queries and queries already in the history
    /// are ignored; returns whether the query was recorded.
    pub fn record(&mut self, query: &str) -> bool {
        if query.trim().is_empty() || self.entries.iter().any(|q| q == query) {
            return false;
        }
        self.entries.insert(0, query.to_string());
        self.entries.truncate(SEARCH_HISTORY_LIMIT);
        self.slot.save(&self.entries);
        true
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.slot.remove();
    }
}
