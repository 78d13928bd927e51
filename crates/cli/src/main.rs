//! Vitrine CLI - one-shot access to the catalog and the stored cart.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! vt products --search chair --sort price-asc
//! vt products --category furniture --page 2
//! vt categories
//! vt show 17
//!
//! # Work with the cart kept in the data directory
//! vt cart add 17
//! vt cart show
//! vt checkout --name "Anna" --phone "555-0100" --address "Main St 1"
//!
//! # Use another feed or data directory than the environment says
//! vt --feed https://shop.example.com/data.json products
//! ```
//!
//! # Commands
//!
//! - `products` - List one page of the filtered, sorted catalog
//! - `categories` - Price range and product counts per category
//! - `show` - One product in full
//! - `cart show|add|clear` - Inspect or change the stored cart
//! - `checkout` - Place a mock order and empty the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vitrine_core::{CheckoutForm, ProductId};
use vitrine_storefront::catalog::FeedSource;
use vitrine_storefront::config::StorefrontConfig;

mod commands;

use commands::catalog::ProductQuery;

#[derive(Parser)]
#[command(name = "vt")]
#[command(author, version, about = "Vitrine catalog and cart from the command line")]
struct Cli {
    /// Product feed URL or file (overrides `VITRINE_FEED`)
    #[arg(long, global = true)]
    feed: Option<String>,

    /// Cart storage directory (overrides `VITRINE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of the catalog
    Products(ProductQuery),
    /// Show the price range and product counts per category
    Categories,
    /// Show one product in full
    Show {
        /// Product ID
        id: ProductId,
    },
    /// Inspect or change the stored cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place a mock order for the stored cart
    Checkout {
        /// Customer name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Contact phone
        #[arg(short, long, default_value = "")]
        phone: String,

        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        id: ProductId,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove everything from the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so they stay out of the command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(feed) = cli.feed {
        config = config.with_feed(FeedSource::parse(&feed));
    }
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    match cli.command {
        Commands::Products(query) => commands::catalog::products(&config, &query).await?,
        Commands::Categories => commands::catalog::categories(&config).await?,
        Commands::Show { id } => commands::catalog::show(&config, id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config),
            CartAction::Add { id, quantity } => {
                commands::cart::add(&config, id, quantity).await?;
            }
            CartAction::Clear => commands::cart::clear(&config)?,
        },
        Commands::Checkout {
            name,
            phone,
            address,
        } => commands::cart::checkout(&config, &CheckoutForm::new(name, phone, address))?,
    }
    Ok(())
}
