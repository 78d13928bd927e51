//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! # Second page of furniture under 100, cheapest first
//! vt products --category furniture --max-price 100 --sort price-asc --page 2
//!
//! # Price range and product counts per category
//! vt categories
//!
//! # One product in full
//! vt show 17
//! ```

use clap::Args;
use vitrine_core::{Price, ProductId};
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::error::AppError;
use vitrine_storefront::query::{FilterState, PaginationState, SortSpec, compute};
use vitrine_storefront::render::{CatalogPage, Renderer};

use super::{CliError, load_catalog, renderer};

/// Filters, sort order and page for `vt products`.
#[derive(Debug, Clone, Args)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only products in this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Hide products above this price
    #[arg(short, long)]
    pub max_price: Option<Price>,

    /// Sort order
    #[arg(
        long,
        default_value = "none",
        value_parser = ["none", "price-asc", "price-desc", "name-asc", "name-desc"]
    )]
    pub sort: String,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

impl ProductQuery {
    fn filter(&self) -> FilterState {
        let mut filter = FilterState::default();
        if let Some(search) = &self.search {
            filter.set_search(search.as_str());
        }
        filter.set_category(self.category.clone());
        filter.set_price_ceiling(self.max_price);
        filter
    }
}

/// List one page of the catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn products(config: &StorefrontConfig, query: &ProductQuery) -> Result<(), CliError> {
    let store = load_catalog(config).await?;

    let filter = query.filter();
    let sort = SortSpec::parse(&query.sort);
    let pagination = PaginationState::at(query.page);

    let result = compute(store.products(), &filter, sort, &pagination);
    renderer(config).catalog(&CatalogPage {
        result: &result,
        filter: &filter,
        sort,
    });
    Ok(())
}

/// Show the catalog price range and per-category counts.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn categories(config: &StorefrontConfig) -> Result<(), CliError> {
    let store = load_catalog(config).await?;
    let mut out = renderer(config);
    out.price_bounds(store.price_bounds());
    out.category_counts(&store.category_counts());
    Ok(())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or has no such product.
pub async fn show(config: &StorefrontConfig, id: ProductId) -> Result<(), CliError> {
    let store = load_catalog(config).await?;
    let product = store.get(id).ok_or(AppError::NotFound(id))?;
    renderer(config).product_detail(product);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builds_filter() {
        let query = ProductQuery {
            search: Some("Chair".to_string()),
            category: Some("furniture".to_string()),
            max_price: Some(Price::from_units(100)),
            sort: "price-asc".to_string(),
            page: 1,
        };
        let filter = query.filter();
        assert_eq!(filter.search(), "Chair");
        assert_eq!(filter.category(), Some("furniture"));
        assert_eq!(filter.price_ceiling(), Some(Price::from_units(100)));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = ProductQuery {
            search: None,
            category: None,
            max_price: None,
            sort: "none".to_string(),
            page: 1,
        };
        assert!(query.filter().is_empty());
    }
}
