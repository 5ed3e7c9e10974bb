//! TestMart storefront library.
//!
//! The client-side state of the TestMart demo store: mock sign-in, cart,
//! wishlist, comparison, price alerts, reviews, search and checkout, all
//! persisted to a flat key/value store. Also ships the catalog of canned
//! automation scenarios and the Selenium/Playwright snippet generator.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod forms;
pub mod models;
pub mod scenarios;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{AppError, Notification, Result};
pub use state::Storefront;
