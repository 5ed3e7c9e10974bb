//! Account domain type.

use serde::{Deserialize, Serialize};

use testmart_core::{AccountId, AccountRole, Email};

/// A mock storefront account.
///
/// Accounts are fixed configuration; they are only ever logged into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Login email.
    pub email: Email,
    /// Display name shown in greetings and on reviews.
    pub name: String,
    /// Role, which decides what the dashboard shows.
    pub role: AccountRole,
    /// Locked accounts can never sign in.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_locked: bool,
}

impl Account {
    /// Whether this account sees the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, AccountRole::Admin)
    }
}
