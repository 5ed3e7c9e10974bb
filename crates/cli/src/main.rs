//! TestMart CLI - drive the storefront state from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and fill the cart
//! testmart login -e buyer@test.com -p buyer123
//! testmart cart add 1
//! testmart cart coupon SAVE10
//!
//! # Browse
//! testmart products --query watch --sort price-low
//! testmart product 14
//!
//! # Watch for simulated price drops
//! testmart alert create 1 --target 250
//! testmart alert watch --count 1
//!
//! # Generate automation source
//! testmart snippet AUTH_001 AUTH_002 --framework playwright
//! testmart snippet --area checkout -o checkout_test.py
//! ```
//!
//! State persists under `TESTMART_DATA_DIR` (see `StorefrontConfig`), so
//! each invocation picks up where the last one left off. Logs go to stderr;
//! results go to stdout as a table, JSON or YAML.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use testmart_core::ProductId;
use testmart_storefront::config::StorefrontConfig;
use testmart_storefront::{AppError, Notification, Storefront};

mod commands;
mod error;
mod output;

use commands::alerts::AlertAction;
use commands::cart::{CartAction, CheckoutArgs, CompareAction, WishlistAction};
use commands::reviews::ReviewAction;
use commands::scenarios::{ScenarioAction, SnippetArgs};
use commands::shop::{RecommendAction, SearchArgs};
use error::CliError;
use output::{Format, Output};

#[derive(Parser)]
#[command(name = "testmart")]
#[command(author, version, about = "TestMart storefront CLI")]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    format: Format,

    /// Override the storage directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to a mock account
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List the mock accounts
    Accounts,
    /// Search and filter the catalog
    Products(SearchArgs),
    /// Open a product page
    Product { id: ProductId },
    /// Type-ahead suggestions
    Suggest { query: String },
    /// List categories
    Categories,
    /// Show recent searches
    History {
        /// Forget them
        #[arg(long)]
        clear: bool,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage the comparison list
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },
    /// Manage price alerts
    Alert {
        #[command(subcommand)]
        action: AlertAction,
    },
    /// Read and write reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Product recommendations
    Recommend {
        #[command(subcommand)]
        action: RecommendAction,
    },
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Chat with the support bot
    Chat {
        /// Messages to send; reads stdin when omitted
        #[arg(short, long = "message")]
        messages: Vec<String>,
    },
    /// Browse the automation scenario catalog
    Scenarios {
        #[command(subcommand)]
        action: ScenarioAction,
    },
    /// Generate Selenium or Playwright source for scenarios
    Snippet(SnippetArgs),
    /// Show automation targets of special products
    Fixtures { id: Option<ProductId> },
    /// Run the timed popup schedule
    Popups,
    /// Forget all stored state
    Reset,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "testmart_storefront=info,testmart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {}", e.message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = StorefrontConfig::from_env().map_err(AppError::from)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let mut store = if cli.in_memory {
        Storefront::in_memory(config)
    } else {
        Storefront::open(config).map_err(AppError::from)?
    };
    let out = Output::new(cli.format);

    match cli.command {
        Commands::Login { email, password } => {
            out.emit(&commands::session::login(&mut store, &email, &password)?)?;
        }
        Commands::Logout => out.emit(&commands::session::logout(&mut store))?,
        Commands::Whoami => out.emit(&commands::session::whoami(&store))?,
        Commands::Accounts => out.emit(&commands::session::accounts())?,
        Commands::Products(args) => out.emit(&commands::shop::search(&mut store, &args))?,
        Commands::Product { id } => out.emit(&commands::shop::show(&mut store, id)?)?,
        Commands::Suggest { query } => out.emit(&commands::shop::suggest(&query))?,
        Commands::Categories => out.emit(&commands::shop::categories())?,
        Commands::History { clear } => out.emit(&commands::shop::history(&mut store, clear))?,
        Commands::Cart { action } => {
            let toast = commands::cart::cart(&mut store, &action)?;
            show_toast(&out, toast.as_ref())?;
            out.emit(&commands::cart::CartView::of(&store))?;
        }
        Commands::Wishlist { action } => {
            let toast = commands::cart::wishlist(&mut store, &action)?;
            show_toast(&out, toast.as_ref())?;
            out.emit(&commands::cart::wishlist_items(&store))?;
        }
        Commands::Compare { action } => {
            let toast = commands::cart::compare(&mut store, &action)?;
            show_toast(&out, toast.as_ref())?;
            out.emit(&commands::cart::comparison_items(&store))?;
        }
        Commands::Alert { action } => match action {
            AlertAction::List => out.emit(&commands::alerts::list(&store))?,
            AlertAction::Create { id, target, email } => {
                out.emit(&commands::alerts::create(&store, id, target, email.as_deref())?)?;
            }
            AlertAction::Remove { id } => out.emit(&commands::alerts::remove(&store, id)?)?,
            AlertAction::History { id } => out.emit(&commands::alerts::history(&store, id))?,
            AlertAction::Watch { count } => commands::alerts::watch(&store, count, &out).await?,
        },
        Commands::Review { action } => match action {
            ReviewAction::List { id } => out.emit(&commands::reviews::list(&store, id)?)?,
            ReviewAction::Write(args) => out.emit(&commands::reviews::write(&mut store, args)?)?,
            ReviewAction::Helpful { id } => {
                out.emit(&commands::reviews::helpful(&mut store, id)?)?;
            }
        },
        Commands::Recommend { action } => {
            out.emit(&commands::shop::recommend(&store, &action)?)?;
        }
        Commands::Checkout(args) => {
            let form = args.shipping_form(&store)?;
            out.emit(&commands::cart::checkout(&mut store, &form)?)?;
        }
        Commands::Chat { messages } => commands::chat::chat(&store, &messages, &out).await?,
        Commands::Scenarios { action } => match action {
            ScenarioAction::List { area, kind } => {
                out.emit(&commands::scenarios::list(area, kind))?;
            }
            ScenarioAction::Show { id } => out.emit(&commands::scenarios::show(&id)?)?,
        },
        Commands::Snippet(args) => {
            let base = store.config().base_url.clone();
            commands::scenarios::write_snippet(&args, &base, &out)?;
        }
        Commands::Fixtures { id } => out.emit(&commands::scenarios::fixtures(id)?)?,
        Commands::Popups => commands::scenarios::popups(&out).await?,
        Commands::Reset => {
            store.reset().map_err(AppError::from)?;
            out.notify("State Reset", "All stored storefront data has been cleared.")?;
        }
    }
    Ok(())
}

/// Print a toast before the listing it relates to, in table mode only.
fn show_toast(out: &Output, toast: Option<&Notification>) -> Result<(), CliError> {
    match toast {
        Some(toast) if out.is_table() => out.emit(toast)?,
        _ => {}
    }
    Ok(())
}
