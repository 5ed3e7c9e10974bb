//! Navigable storefront pages.
//!
//! Routes are page boundaries, not APIs. They are used to build navigation
//! targets for generated automation scripts and to map a path back to a page.

use core::fmt;

use crate::types::id::ProductId;

/// A storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Products,
    ProductDetail(ProductId),
    Compare,
    Wishlist,
    Cart,
    Checkout,
    ThankYou,
    Dashboard,
    TestCases,
    NotFound,
}

impl Route {
    /// Map a path (query string and fragment ignored) to a page.
    ///
    /// Unknown paths, and product paths whose id is not numeric, map to
    /// [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "" => Self::Home,
            "/login" => Self::Login,
            "/products" => Self::Products,
            "/compare" => Self::Compare,
            "/wishlist" => Self::Wishlist,
            "/cart" => Self::Cart,
            "/checkout" => Self::Checkout,
            "/thank-you" => Self::ThankYou,
            "/dashboard" => Self::Dashboard,
            "/test-cases" => Self::TestCases,
            other => other
                .strip_prefix("/products/")
                .filter(|rest| !rest.contains('/'))
                .and_then(|id| id.parse().ok())
                .map_or(Self::NotFound, Self::ProductDetail),
        }
    }

    /// The canonical path for the page.
    ///
    /// [`Route::NotFound`] renders as `/404`, which itself parses back to
    /// `NotFound`.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductDetail(id) => format!("/products/{id}"),
            Self::Compare => "/compare".to_string(),
            Self::Wishlist => "/wishlist".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::ThankYou => "/thank-you".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::TestCases => "/test-cases".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
