//! Rendering command results as tables, JSON or YAML.

use clap::ValueEnum;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use thiserror::Error;

use testmart_storefront::Notification;

/// Errors that can occur while writing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
    Yaml,
}

/// A command result that can be shown as human-readable text.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Notification {
    fn render(&self) -> String {
        self.to_string()
    }
}

/// Writes command results to stdout in the selected format.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: Format,
}

impl Output {
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    pub const fn is_table(&self) -> bool {
        matches!(self.format, Format::Table)
    }

    /// Print a result.
    #[allow(clippy::print_stdout)]
    pub fn emit<T: Serialize + Render>(&self, value: &T) -> Result<(), OutputError> {
        match self.format {
            Format::Table => println!("{}", value.render()),
            Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
            Format::Yaml => print!("{}", serde_yaml::to_string(value)?),
        }
        Ok(())
    }

    /// Print a plain line, ignoring the format.
    #[allow(clippy::print_stdout)]
    pub fn line(&self, text: impl std::fmt::Display) {
        println!("{text}");
    }

    pub fn notify(&self, title: &str, description: impl Into<String>) -> Result<(), OutputError> {
        self.emit(&Notification::success(title, description))
    }
}

/// A table with the house style and the given header.
pub fn table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contains_rows() {
        let mut t = table(["ID", "Name"]);
        t.add_row(["1", "Wireless Headphones"]);
        let text = t.to_string();
        assert!(text.contains("ID"));
        assert!(text.contains("Wireless Headphones"));
    }

    #[test]
    fn test_notification_renders_title_and_description() {
        let n = Notification::success("Added to Cart", "Laptop has been added to your cart.");
        assert_eq!(n.render(), "Added to Cart: Laptop has been added to your cart.");
    }
}
