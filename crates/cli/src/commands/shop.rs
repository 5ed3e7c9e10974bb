//! Product browsing: search, product pages and recommendations.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use testmart_core::{Price, ProductId};
use testmart_storefront::fixtures::{self, Selector};
use testmart_storefront::models::Product;
use testmart_storefront::services::recommendations::{self, RandomAdmit};
use testmart_storefront::services::search::{self, SearchFilters, SortOrder, Suggestion};
use testmart_storefront::{Result, Storefront, catalog};

use super::ProductRows;
use crate::output::{Render, table};

/// Product list filters.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text matched against name, description and category
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Only this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Lowest price, in dollars
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest price, in dollars
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Lowest average rating
    #[arg(long)]
    pub min_rating: Option<Decimal>,

    /// Hide out-of-stock products
    #[arg(long)]
    pub in_stock: bool,

    /// relevance, price-low, price-high, rating, name or newest
    #[arg(short, long, default_value = "relevance")]
    pub sort: SortOrder,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilters {
        let defaults = SearchFilters::default();
        SearchFilters {
            category: self.category.clone(),
            min_price: self.min_price.map_or(defaults.min_price, Price::new),
            max_price: self.max_price.map_or(defaults.max_price, Price::new),
            min_rating: self.min_rating.unwrap_or(defaults.min_rating),
            in_stock_only: self.in_stock,
            sort: self.sort,
        }
    }
}

/// Search the catalog, remembering non-empty queries.
pub fn search(store: &mut Storefront, args: &SearchArgs) -> ProductRows {
    if !args.query.trim().is_empty() {
        store.search_history_mut().record(args.query.trim());
    }
    ProductRows::from_refs(search::search(
        catalog::products(),
        &args.query,
        &args.filters(),
    ))
}

/// A product page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub product: Product,
    pub in_cart: u32,
    pub in_wishlist: bool,
    pub in_comparison: bool,
    pub review_count: usize,
    pub average_rating: Decimal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<Selector>,
    pub similar: Vec<ProductId>,
    pub bought_together: Vec<ProductId>,
}

/// Open a product page, recording the view.
pub fn show(store: &mut Storefront, id: ProductId) -> Result<ProductPage> {
    let product = store.view_product(id)?;
    let mut admit = RandomAdmit::new(store.config().rng_seed);
    let ids = |found: Vec<&Product>| -> Vec<ProductId> {
        found.into_iter().map(|p| p.id).collect()
    };

    Ok(ProductPage {
        product: product.clone(),
        in_cart: store.cart().quantity_of(id),
        in_wishlist: store.wishlist().contains(id),
        in_comparison: store.comparison().contains(id),
        review_count: store.reviews().product_reviews(id).len(),
        average_rating: store.reviews().average_rating(id),
        selectors: fixtures::selectors(product),
        similar: ids(recommendations::similar(catalog::products(), product)),
        bought_together: ids(recommendations::bought_together(
            catalog::products(),
            product,
            &mut admit,
        )),
    })
}

impl Render for ProductPage {
    fn render(&self) -> String {
        let p = &self.product;
        let list = |ids: &[ProductId]| {
            ids.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut t = table(["Field", "Value"]);
        t.add_row(["ID".to_string(), p.id.to_string()]);
        t.add_row(["Name".to_string(), p.name.clone()]);
        t.add_row(["Category".to_string(), p.category.clone()]);
        t.add_row(["Price".to_string(), p.price.to_string()]);
        t.add_row(["Rating".to_string(), p.rating.to_string()]);
        t.add_row(["In stock".to_string(), p.in_stock.to_string()]);
        t.add_row(["Description".to_string(), p.description.clone()]);
        t.add_row([
            "Reviews".to_string(),
            format!("{} (avg {})", self.review_count, self.average_rating),
        ]);
        t.add_row(["In cart".to_string(), self.in_cart.to_string()]);
        t.add_row(["In wishlist".to_string(), self.in_wishlist.to_string()]);
        t.add_row(["In comparison".to_string(), self.in_comparison.to_string()]);
        if let Some(kind) = p.special_type {
            t.add_row(["Special".to_string(), kind.to_string()]);
            for selector in &self.selectors {
                t.add_row([format!("  {}", selector.role), selector.css()]);
            }
        }
        t.add_row(["Similar".to_string(), list(&self.similar)]);
        t.add_row(["Bought together".to_string(), list(&self.bought_together)]);
        t.to_string()
    }
}

/// Type-ahead suggestions.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Suggestions(pub Vec<Suggestion>);

pub fn suggest(query: &str) -> Suggestions {
    Suggestions(search::suggestions(catalog::products(), query))
}

impl Render for Suggestions {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return "No suggestions.".to_string();
        }
        self.0
            .iter()
            .map(|s| match s {
                Suggestion::Product { text } => text.clone(),
                Suggestion::Category { text, count } => format!("{text} ({count} products)"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Plain list of strings.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Lines(pub Vec<String>);

impl Render for Lines {
    fn render(&self) -> String {
        if self.0.is_empty() {
            return "(empty)".to_string();
        }
        self.0.join("\n")
    }
}

pub fn categories() -> Lines {
    Lines(catalog::categories().into_iter().map(str::to_string).collect())
}

/// Recent search queries, optionally clearing them.
pub fn history(store: &mut Storefront, clear: bool) -> Lines {
    if clear {
        store.search_history_mut().clear();
    }
    Lines(store.search_history().entries().to_vec())
}

#[derive(Debug, Subcommand)]
pub enum RecommendAction {
    /// Recently viewed products
    Recent,
    /// Highly rated in-stock products
    Trending,
    /// Picks from the categories in the cart
    Personalized,
    /// Same-category products
    Similar { id: ProductId },
    /// Frequently bought together
    Together { id: ProductId },
}

pub fn recommend(store: &Storefront, action: &RecommendAction) -> Result<ProductRows> {
    let products = catalog::products();
    let found = match action {
        RecommendAction::Recent => store.recently_viewed().products(products),
        RecommendAction::Trending => recommendations::trending(products),
        RecommendAction::Personalized => {
            recommendations::personalized(products, store.cart().lines())
        }
        RecommendAction::Similar { id } => {
            recommendations::similar(products, super::product(*id)?)
        }
        RecommendAction::Together { id } => {
            let mut admit = RandomAdmit::new(store.config().rng_seed);
            recommendations::bought_together(products, super::product(*id)?, &mut admit)
        }
    };
    Ok(ProductRows::from_refs(found))
}
