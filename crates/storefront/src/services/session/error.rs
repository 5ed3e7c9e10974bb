//! Session error types.

use thiserror::Error;

/// Errors that can occur when signing in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No mock account has this email.
    #[error("user not found")]
    NotFound,

    /// The account exists but the password does not match.
    #[error("incorrect password")]
    InvalidCredential,

    /// The account exists, the password matched, and the account is locked.
    #[error("account is locked")]
    AccountLocked,
}
