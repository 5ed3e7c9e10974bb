//! TestMart Core - Shared types library.
//!
//! This crate provides common types used across all TestMart components:
//! - `storefront` - Client-side state stores, catalog and test-scenario data
//! - `cli` - Command-line driver for the stores
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles and routes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
