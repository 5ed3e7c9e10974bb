//! Cart, wishlist, comparison and checkout commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use testmart_core::{DiscountRate, Price, ProductId};
use testmart_storefront::forms::ShippingForm;
use testmart_storefront::models::{CartLine, OrderConfirmation};
use testmart_storefront::services::collections::{COMPARE_LIMIT, Toggled};
use testmart_storefront::{Notification, Result, Storefront};

use super::{ProductRows, product};
use crate::error::CliError;
use crate::output::{Render, table};

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
    /// Set a product's quantity; zero or less removes it
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Apply a coupon code
    Coupon { code: String },
    /// Empty the cart
    Clear,
}

/// Cart contents and totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_items: u32,
    pub subtotal: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    pub discount: DiscountRate,
    pub discount_amount: Price,
    pub total: Price,
}

impl CartView {
    pub fn of(store: &Storefront) -> Self {
        let cart = store.cart();
        Self {
            lines: cart.lines().to_vec(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
            coupon: cart.applied_coupon().map(str::to_string),
            discount: cart.discount(),
            discount_amount: cart.discount_amount(),
            total: cart.total(),
        }
    }
}

impl Render for CartView {
    fn render(&self) -> String {
        if self.lines.is_empty() {
            return "Your cart is empty.".to_string();
        }
        let mut t = table(["ID", "Name", "Price", "Qty", "Line total"]);
        for line in &self.lines {
            t.add_row([
                line.id.to_string(),
                line.name.clone(),
                line.price.to_string(),
                line.quantity.to_string(),
                line.line_total().to_string(),
            ]);
        }
        let mut summary = format!("{t}\nItems: {}\nSubtotal: {}", self.total_items, self.subtotal);
        if let Some(code) = &self.coupon {
            summary.push_str(&format!(
                "\nDiscount ({code}, {}): -{}",
                self.discount, self.discount_amount
            ));
        }
        summary.push_str(&format!("\nTotal: {}", self.total));
        summary
    }
}

pub fn cart(store: &mut Storefront, action: &CartAction) -> Result<Option<Notification>> {
    let notification = match action {
        CartAction::Show => None,
        CartAction::Add { id } => {
            let item = product(*id)?;
            store.cart_mut().add_line(item)?;
            Some(Notification::success(
                "Added to Cart",
                format!("{} has been added to your cart.", item.name),
            ))
        }
        CartAction::Remove { id } => {
            store.cart_mut().remove_line(*id);
            Some(Notification::success(
                "Removed from Cart",
                "Item has been removed from your cart.",
            ))
        }
        CartAction::Set { id, quantity } => {
            store.cart_mut().set_quantity(*id, *quantity);
            None
        }
        CartAction::Coupon { code } => {
            let rate = store.cart_mut().apply_coupon(code)?;
            Some(Notification::success(
                "Coupon Applied",
                format!("{rate} discount applied!"),
            ))
        }
        CartAction::Clear => {
            store.cart_mut().clear();
            None
        }
    };
    Ok(notification)
}

#[derive(Debug, Subcommand)]
pub enum WishlistAction {
    /// List wishlisted products
    Show,
    /// Add a product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
    /// Add the product if absent, otherwise remove it
    Toggle { id: ProductId },
    /// Remove everything
    Clear,
}

pub fn wishlist(store: &mut Storefront, action: &WishlistAction) -> Result<Option<Notification>> {
    let notification = match action {
        WishlistAction::Show => None,
        WishlistAction::Add { id } => {
            let item = product(*id)?;
            store.wishlist_mut().add(item)?;
            Some(added_to_wishlist(&item.name))
        }
        WishlistAction::Remove { id } => {
            let item = product(*id)?;
            store.wishlist_mut().remove(*id);
            Some(Notification::success(
                "Removed from Wishlist",
                format!("{} has been removed from your wishlist.", item.name),
            ))
        }
        WishlistAction::Toggle { id } => {
            let item = product(*id)?;
            Some(match store.wishlist_mut().toggle(item) {
                Toggled::Added => added_to_wishlist(&item.name),
                Toggled::Removed => Notification::success(
                    "Removed from Wishlist",
                    format!("{} has been removed from your wishlist.", item.name),
                ),
            })
        }
        WishlistAction::Clear => {
            store.wishlist_mut().clear();
            Some(Notification::success(
                "Wishlist Cleared",
                "All items have been removed from your wishlist.",
            ))
        }
    };
    Ok(notification)
}

fn added_to_wishlist(name: &str) -> Notification {
    Notification::success(
        "Added to Wishlist",
        format!("{name} has been added to your wishlist."),
    )
}

pub fn wishlist_items(store: &Storefront) -> ProductRows {
    ProductRows(store.wishlist().items().to_vec())
}

#[derive(Debug, Subcommand)]
pub enum CompareAction {
    /// Show the comparison list
    Show,
    /// Add a product
    Add { id: ProductId },
    /// Remove a product
    Remove { id: ProductId },
    /// Remove everything
    Clear,
}

pub fn compare(store: &mut Storefront, action: &CompareAction) -> Result<Option<Notification>> {
    let notification = match action {
        CompareAction::Show => None,
        CompareAction::Add { id } => {
            let item = product(*id)?;
            store.comparison_mut().add(item)?;
            Some(Notification::success(
                "Added to Comparison",
                format!(
                    "{} has been added to comparison ({}/{COMPARE_LIMIT}).",
                    item.name,
                    store.comparison().len()
                ),
            ))
        }
        CompareAction::Remove { id } => {
            store.comparison_mut().remove(*id);
            Some(Notification::success(
                "Removed from Comparison",
                "Product has been removed from comparison.",
            ))
        }
        CompareAction::Clear => {
            store.comparison_mut().clear();
            Some(Notification::success(
                "Comparison Cleared",
                "All products have been removed from comparison.",
            ))
        }
    };
    Ok(notification)
}

pub fn comparison_items(store: &Storefront) -> ProductRows {
    ProductRows(store.comparison().items().to_vec())
}

/// Shipping details for `checkout`. Fields given on the command line
/// override those read from `--form`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// YAML or JSON file with the shipping form
    #[arg(long)]
    pub form: Option<PathBuf>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Defaults to the signed-in account's email
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip_code: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

impl CheckoutArgs {
    /// Assemble the shipping form.
    pub fn shipping_form(&self, store: &Storefront) -> std::result::Result<ShippingForm, CliError> {
        let mut form = match &self.form {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| CliError::File {
                    path: path.display().to_string(),
                    source,
                })?;
                serde_yaml::from_str(&raw)?
            }
            None => ShippingForm::default(),
        };

        let overrides = [
            (&mut form.first_name, &self.first_name),
            (&mut form.last_name, &self.last_name),
            (&mut form.email, &self.email),
            (&mut form.phone, &self.phone),
            (&mut form.address, &self.address),
            (&mut form.city, &self.city),
            (&mut form.state, &self.state),
            (&mut form.zip_code, &self.zip_code),
            (&mut form.country, &self.country),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }

        if form.email.trim().is_empty() {
            if let Some(account) = store.session().current() {
                form.email = account.email.to_string();
            }
        }
        Ok(form)
    }
}

impl Render for OrderConfirmation {
    fn render(&self) -> String {
        let mut t = table(["Item", "Qty", "Line total"]);
        for line in &self.items {
            t.add_row([
                line.name.clone(),
                line.quantity.to_string(),
                line.line_total().to_string(),
            ]);
        }
        let ship = &self.shipping;
        format!(
            "Order Placed Successfully!\nOrder number: {}\n{t}\nSubtotal: {}\nDiscount: {}\nTotal: {}\nShip to: {} {}, {}, {}, {} {}, {}",
            self.order_number,
            self.subtotal,
            self.discount,
            self.total,
            ship.first_name,
            ship.last_name,
            ship.address,
            ship.city,
            ship.state,
            ship.zip_code,
            ship.country,
        )
    }
}

pub fn checkout(store: &mut Storefront, form: &ShippingForm) -> Result<OrderConfirmation> {
    Ok(store.checkout(form)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use testmart_storefront::config::StorefrontConfig;

    use super::*;

    fn storefront() -> Storefront {
        Storefront::in_memory(StorefrontConfig::from_lookup(|_| None).unwrap())
    }

    #[test]
    fn test_cart_add_and_coupon() {
        let mut store = storefront();
        let added = cart(&mut store, &CartAction::Add { id: ProductId::new(1) })
            .unwrap()
            .unwrap();
        assert_eq!(added.title, "Added to Cart");

        cart(&mut store, &CartAction::Coupon { code: "SAVE10".into() }).unwrap();
        let view = CartView::of(&store);
        assert_eq!(view.total_items, 1);
        assert_eq!(view.coupon.as_deref(), Some("SAVE10"));
        assert!(view.render().contains("Discount (SAVE10, 10%)"));
    }

    #[test]
    fn test_wishlist_toggle_reports_direction() {
        let mut store = storefront();
        let toggle = WishlistAction::Toggle { id: ProductId::new(3) };
        assert_eq!(
            wishlist(&mut store, &toggle).unwrap().unwrap().title,
            "Added to Wishlist"
        );
        assert_eq!(
            wishlist(&mut store, &toggle).unwrap().unwrap().title,
            "Removed from Wishlist"
        );
        assert!(wishlist_items(&store).0.is_empty());
    }

    #[test]
    fn test_checkout_prefills_session_email() {
        let mut store = storefront();
        store
            .session_mut()
            .authenticate("buyer@test.com", "buyer123")
            .unwrap();
        let args = CheckoutArgs {
            form: None,
            first_name: Some("John".into()),
            last_name: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
        };
        let form = args.shipping_form(&store).unwrap();
        assert_eq!(form.email, "buyer@test.com");
        assert_eq!(form.first_name, "John");
        assert_eq!(form.country, "US");
    }
}
