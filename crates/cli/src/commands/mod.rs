//! `vt` subcommand implementations.
//!
//! Each command is one-shot: it loads what it needs (the catalog, the stored
//! cart, or both), applies a single action and renders the result to stdout.

pub mod cart;
pub mod catalog;

use std::io::Stdout;

use thiserror::Error;
use vitrine_storefront::cart::{CartStore, FileStorage, StorageError};
use vitrine_storefront::catalog::{Feed, FeedError, ProductStore};
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::error::AppError;
use vitrine_storefront::render::TextRenderer;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The product feed could not be loaded.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// The cart could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A storefront action was refused.
    #[error("{}", .0.user_message())]
    App(#[from] AppError),
}

/// Fetch the catalog from the configured feed.
async fn load_catalog(config: &StorefrontConfig) -> Result<ProductStore, CliError> {
    tracing::info!(feed = %config.feed, "loading catalog");
    let feed = Feed::from_source(&config.feed, config.feed_timeout)?;
    Ok(ProductStore::load(&feed).await?)
}

/// Open the cart stored under the configured data directory.
fn open_cart(config: &StorefrontConfig) -> CartStore<FileStorage> {
    CartStore::open(FileStorage::new(&config.data_dir))
}

fn renderer(config: &StorefrontConfig) -> TextRenderer<Stdout> {
    TextRenderer::new(std::io::stdout(), config.currency.clone())
}
