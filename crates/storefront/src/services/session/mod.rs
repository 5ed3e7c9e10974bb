//! Session store.
//!
//! Signs visitors into one of the fixed mock accounts and keeps the signed-in
//! account (plus a mock bearer token) in storage so the session survives a
//! reload. There is no expiry and no real credential handling: passwords are
//! compared in plain text against the mock table.

mod error;

use std::sync::LazyLock;

use tracing::{debug, info, instrument};

use testmart_core::{AccountId, AccountRole, Email};

pub use error::SessionError;

use crate::models::Account;
use crate::storage::{Persisted, SharedStorage, keys};

struct MockAccount {
    account: Account,
    password: &'static str,
}

fn mock(id: u32, email: &str, password: &'static str, name: &str, role: AccountRole) -> MockAccount {
    MockAccount {
        account: Account {
            id: AccountId::new(id),
            email: Email::parse(email).expect("Invalid mock account email"),
            name: name.to_string(),
            role,
            is_locked: false,
        },
        password,
    }
}

static ACCOUNTS: LazyLock<Vec<MockAccount>> = LazyLock::new(|| {
    let mut locked = mock(4, "locked@test.com", "locked123", "Locked User", AccountRole::Buyer);
    locked.account.is_locked = true;

    vec![
        mock(1, "admin@test.com", "admin123", "Admin User", AccountRole::Admin),
        mock(2, "buyer@test.com", "buyer123", "John Buyer", AccountRole::Buyer),
        mock(3, "guest@test.com", "guest123", "Guest User", AccountRole::Guest),
        locked,
    ]
});

/// The fixed mock account table.
pub fn accounts() -> impl Iterator<Item = &'static Account> {
    ACCOUNTS.iter().map(|entry| &entry.account)
}

/// Mock bearer token issued to an account at sign-in.
#[must_use]
pub fn mock_token(id: AccountId) -> String {
    format!("token_{id}")
}

/// The current signed-in identity.
#[derive(Debug)]
pub struct SessionStore {
    current: Option<Account>,
    user_slot: Persisted<Account>,
    token_slot: Persisted<String>,
}

impl SessionStore {
    /// Create the store, restoring any persisted identity.
    #[must_use]
    pub fn new(storage: SharedStorage) -> Self {
        let user_slot: Persisted<Account> = Persisted::new(storage.clone(), keys::AUTH_USER);
        let token_slot = Persisted::new(storage, keys::AUTH_TOKEN);
        let current = user_slot.load();
        if let Some(account) = &current {
            debug!(account_id = %account.id, "Restored session");
        }
        Self {
            current,
            user_slot,
            token_slot,
        }
    }

    /// Sign in with an email and password.
    ///
    /// The locked check runs after the password check, so a locked account
    /// with a wrong password reports `InvalidCredential`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for an unknown email,
    /// `SessionError::InvalidCredential` for a wrong password and
    /// `SessionError::AccountLocked` for a locked account. The current
    /// identity is left unchanged on error.
    #[instrument(skip(self, password))]
    pub fn authenticate(&mut self, email: &str, password: &str) -> Result<&Account, SessionError> {
        let entry = ACCOUNTS
            .iter()
            .find(|entry| entry.account.email.as_str() == email)
            .ok_or(SessionError::NotFound)?;

        if entry.password != password {
            return Err(SessionError::InvalidCredential);
        }

        if entry.account.is_locked {
            return Err(SessionError::AccountLocked);
        }

        let account = entry.account.clone();
        self.user_slot.save(&account);
        self.token_slot.save(&mock_token(account.id));
        info!(account_id = %account.id, role = %account.role, "Signed in");

        Ok(self.current.insert(account))
    }

    /// Sign out and forget the persisted identity.
    pub fn end_session(&mut self) {
        if let Some(account) = self.current.take() {
            info!(account_id = %account.id, "Signed out");
        }
        self.user_slot.remove();
        self.token_slot.remove();
    }

    #[must_use]
    pub const fn current(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// The persisted mock token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.current.as_ref()?;
        self.token_slot.load()
    }
}
