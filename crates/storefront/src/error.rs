//! Unified error handling.
//!
//! Every store has its own error enum. `AppError` wraps them so callers that
//! drive several stores can use `?` throughout, and maps each failure to the
//! transient [`Notification`] the storefront shows for it.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::forms::FieldErrors;
use crate::scenarios::SnippetError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::collections::CollectionError;
use crate::services::price_alert::AlertError;
use crate::services::reviews::ReviewError;
use crate::services::session::SessionError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Sign-in failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Wishlist or comparison operation failed.
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    /// Price alert operation failed.
    #[error("Price alert error: {0}")]
    Alert(#[from] AlertError),

    /// Review operation failed.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Order could not be placed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Snippet generation failed.
    #[error("Snippet error: {0}")]
    Snippet(#[from] SnippetError),

    /// Form input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] FieldErrors),

    /// Requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// How a notification is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient toast shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    /// A neutral confirmation toast.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    /// A red error toast.
    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

impl AppError {
    /// The toast the storefront shows for this failure.
    #[must_use]
    pub fn notification(&self) -> Notification {
        let (title, description): (&str, String) = match self {
            Self::Session(err) => match err {
                SessionError::NotFound => ("Invalid Credentials", "User not found".into()),
                SessionError::InvalidCredential => {
                    ("Invalid Credentials", "Incorrect password".into())
                }
                SessionError::AccountLocked => (
                    "Account Locked",
                    "Your account has been locked. Please contact support.".into(),
                ),
            },
            Self::Cart(err) => match err {
                CartError::InvalidCoupon(_) => (
                    "Invalid Coupon",
                    "The coupon code you entered is not valid.".into(),
                ),
                CartError::OutOfStock(_) => {
                    ("Out of Stock", "This product is currently out of stock.".into())
                }
                CartError::ProductNotFound(_) => {
                    ("Product Not Found", "This product does not exist.".into())
                }
            },
            Self::Collection(err) => match err {
                CollectionError::AlreadyPresent(_, "wishlist") => (
                    "Already in Wishlist",
                    "This product is already in your wishlist.".into(),
                ),
                CollectionError::AlreadyPresent(_, _) => (
                    "Already in Comparison",
                    "This product is already in your comparison list.".into(),
                ),
                CollectionError::LimitReached(limit) => (
                    "Comparison Limit Reached",
                    format!("You can only compare up to {limit} products at once."),
                ),
            },
            Self::Alert(err) => match err {
                AlertError::InvalidTarget { .. } => (
                    "Invalid Target Price",
                    "Target price must be lower than current price.".into(),
                ),
                AlertError::DuplicateAlert { .. } => (
                    "Alert Already Exists",
                    "You already have an active price alert for this product.".into(),
                ),
                AlertError::AlertNotFound(_) => {
                    ("Alert Not Found", "This price alert no longer exists.".into())
                }
            },
            Self::Review(err) => match err {
                ReviewError::Unauthenticated => (
                    "Login Required",
                    "You must be logged in to write a review.".into(),
                ),
                ReviewError::DuplicateReview(_) => (
                    "Review Already Exists",
                    "You have already reviewed this product.".into(),
                ),
                ReviewError::InvalidRating(_) => (
                    "Invalid Rating",
                    "Please choose a rating between 1 and 5 stars.".into(),
                ),
                ReviewError::ReviewNotFound(_) => {
                    ("Review Not Found", "This review no longer exists.".into())
                }
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart => (
                    "Cart Empty",
                    "Add items to your cart before checking out.".into(),
                ),
                CheckoutError::InvalidForm(_) => (
                    "Missing Information",
                    "Please fill in all required fields.".into(),
                ),
            },
            Self::InvalidInput(errors) => (
                "Invalid Input",
                errors
                    .iter()
                    .next()
                    .map_or_else(String::new, |(_, message)| message.to_string()),
            ),
            Self::Snippet(err) => ("Snippet Unavailable", err.to_string()),
            Self::NotFound(what) => ("Not Found", format!("{what} not found.")),
            Self::Config(_) | Self::Storage(_) => {
                ("Something Went Wrong", "Please try again.".into())
            }
        };
        Notification::destructive(title, description)
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
