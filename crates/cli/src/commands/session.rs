//! Sign-in commands.

use serde::Serialize;

use testmart_storefront::forms::LoginForm;
use testmart_storefront::models::Account;
use testmart_storefront::services::session;
use testmart_storefront::{Notification, Result, Storefront};

use crate::output::{Render, table};

/// Validate the login form, then sign in.
pub fn login(store: &mut Storefront, email: &str, password: &str) -> Result<Notification> {
    LoginForm::new(email, password).validate()?;
    let account = store.session_mut().authenticate(email, password)?;
    Ok(Notification::success(
        "Login Successful",
        format!("Welcome back, {}!", account.name),
    ))
}

pub fn logout(store: &mut Storefront) -> Notification {
    store.session_mut().end_session();
    Notification::success("Logged Out", "You have been successfully logged out.")
}

/// The signed-in account, if any.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct WhoAmI(pub Option<Account>);

pub fn whoami(store: &Storefront) -> WhoAmI {
    WhoAmI(store.session().current().cloned())
}

impl Render for WhoAmI {
    fn render(&self) -> String {
        self.0.as_ref().map_or_else(
            || "Not signed in.".to_string(),
            |a| format!("{} <{}> ({})", a.name, a.email, a.role),
        )
    }
}

/// The mock account table, without passwords.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Accounts(pub Vec<Account>);

pub fn accounts() -> Accounts {
    Accounts(session::accounts().cloned().collect())
}

impl Render for Accounts {
    fn render(&self) -> String {
        let mut t = table(["ID", "Email", "Name", "Role", "Locked"]);
        for a in &self.0 {
            t.add_row([
                a.id.to_string(),
                a.email.to_string(),
                a.name.clone(),
                a.role.to_string(),
                a.is_locked.to_string(),
            ]);
        }
        t.to_string()
    }
}
