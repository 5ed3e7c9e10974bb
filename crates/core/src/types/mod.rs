//! Core types for TestMart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod route;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{DiscountRate, DiscountRateError, Price};
pub use route::Route;
pub use status::*;
