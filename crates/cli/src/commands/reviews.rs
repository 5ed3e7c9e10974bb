//! Review commands.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use testmart_core::{ProductId, ReviewId};
use testmart_storefront::models::{RatingDistribution, Review, ReviewDraft};
use testmart_storefront::{Notification, Result, Storefront};

use super::product;
use crate::output::{Render, table};

#[derive(Debug, Subcommand)]
pub enum ReviewAction {
    /// Show a product's reviews and rating summary
    List { id: ProductId },
    /// Review a product as the signed-in account
    Write(WriteArgs),
    /// Mark a review as helpful
    Helpful { id: ReviewId },
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    pub id: ProductId,
    /// Stars, 1-5
    #[arg(short, long)]
    pub rating: u8,
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long)]
    pub comment: String,
    /// Mark as a verified purchase
    #[arg(long)]
    pub verified: bool,
    /// Image URLs
    #[arg(long = "image")]
    pub images: Vec<String>,
}

/// A product's reviews with their aggregates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviews {
    pub product_id: ProductId,
    pub average_rating: Decimal,
    pub distribution: RatingDistribution,
    pub reviews: Vec<Review>,
}

pub fn list(store: &Storefront, id: ProductId) -> Result<ProductReviews> {
    product(id)?;
    let reviews = store.reviews();
    Ok(ProductReviews {
        product_id: id,
        average_rating: reviews.average_rating(id),
        distribution: reviews.rating_distribution(id),
        reviews: reviews.product_reviews(id).into_iter().cloned().collect(),
    })
}

impl Render for ProductReviews {
    fn render(&self) -> String {
        let total = self.distribution.total();
        let mut out = format!("Average rating: {} ({total} reviews)\n", self.average_rating);
        for (stars, count) in self.distribution.iter() {
            out.push_str(&format!("  {stars} star: {count}\n"));
        }
        if self.reviews.is_empty() {
            out.push_str("No reviews yet.");
            return out;
        }
        let mut t = table(["ID", "Rating", "Title", "Author", "Date", "Verified", "Helpful"]);
        for r in &self.reviews {
            t.add_row([
                r.id.to_string(),
                r.rating.to_string(),
                r.title.clone(),
                r.user_name.clone(),
                r.date.to_string(),
                r.verified.to_string(),
                r.helpful.to_string(),
            ]);
        }
        out.push_str(&t.to_string());
        out
    }
}

pub fn write(store: &mut Storefront, args: WriteArgs) -> Result<Notification> {
    product(args.id)?;
    store.write_review(ReviewDraft {
        product_id: args.id,
        rating: args.rating,
        title: args.title,
        comment: args.comment,
        verified: args.verified,
        images: args.images,
    })?;
    Ok(Notification::success("Review Added", "Thank you for your review!"))
}

pub fn helpful(store: &mut Storefront, id: ReviewId) -> Result<Notification> {
    store.reviews_mut().mark_helpful(id)?;
    Ok(Notification::success(
        "Thank you!",
        "Your feedback has been recorded.",
    ))
}
