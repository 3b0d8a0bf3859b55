//! Shopfront CLI - catalog and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the catalog, cheapest first
//! shopfront-cli catalog fetch --sort price-asc
//!
//! # Only one category
//! shopfront-cli catalog fetch --category electronics
//!
//! # Add product 3 to the persisted cart, then show it
//! shopfront-cli cart add 3
//! shopfront-cli cart show
//! ```
//!
//! # Commands
//!
//! - `catalog fetch` - Load the catalog (falling back to the cache) and print it
//! - `catalog categories` - Print the catalog's categories
//! - `cart show|add|remove|clear` - Inspect or change the persisted cart
//!
//! Configuration comes from the same environment variables as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopfront_core::{ProductId, SortKey};

mod commands;

#[derive(Parser)]
#[command(name = "shopfront-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load the catalog and print the products
    Fetch {
        /// Only show this category (`all` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order (`none`, `price-asc`, `price-desc`, `name`)
        #[arg(short, long, default_value = "none")]
        sort: SortKey,
    },
    /// Print the distinct categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart and its totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove a product line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Fetch { category, sort } => {
                commands::catalog::fetch(&ctx, category.as_deref(), sort).await?;
            }
            CatalogAction::Categories => commands::catalog::categories(&ctx).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { id } => commands::cart::add(&ctx, id).await?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, id),
            CartAction::Clear => commands::cart::clear(&ctx),
        },
    }
    Ok(())
}
