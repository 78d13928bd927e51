//! The product catalog.
//!
//! [`ProductStore`] is filled once from a [`ProductFeed`] and is read-only
//! afterwards. Besides the product list it answers the two sidebar questions
//! the catalog view needs before any filter is applied: the price range for
//! the price control, and the number of products per category.

mod feed;

pub use feed::{FeedError, FeedSource, FileFeed, Feed, HttpFeed, ProductFeed, parse_products};

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, instrument};
use vitrine_core::{Price, Product, ProductId};

/// Cheapest and most expensive price in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBounds {
    pub min: Price,
    pub max: Price,
}

/// Number of catalog products carrying a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// The full product collection, in feed order.
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl ProductStore {
    /// Fetch the catalog from `feed`.
    ///
    /// # Errors
    ///
    /// Returns the feed's error unchanged; there is no retry.
    #[instrument(skip(feed))]
    pub async fn load(feed: &impl ProductFeed) -> Result<Self, FeedError> {
        let products = feed.fetch().await?;
        let store = Self::from_products(products);
        info!(
            products = store.len(),
            categories = store.category_counts().len(),
            "catalog loaded"
        );
        Ok(store)
    }

    /// Build a store from an already loaded product list.
    ///
    /// If the feed repeats an id, lookups by id resolve to its first entry.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            index.entry(product.id).or_insert(position);
        }
        Self { products, index }
    }

    /// All products in feed order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&i| self.products.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Price range of the catalog, or `None` when it is empty.
    #[must_use]
    pub fn price_bounds(&self) -> Option<PriceBounds> {
        let min = self.products.iter().map(|p| p.price).min()?;
        let max = self.products.iter().map(|p| p.price).max()?;
        Some(PriceBounds { min, max })
    }

    /// Product count per category over the whole catalog.
    ///
    /// Categories are listed in order of first appearance. The counts ignore
    /// every active filter: they describe the catalog, not the current query.
    #[must_use]
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for product in &self.products {
            if let Some(&i) = positions.get(product.category.as_str()) {
                if let Some(entry) = counts.get_mut(i) {
                    entry.count += 1;
                }
            } else {
                positions.insert(&product.category, counts.len());
                counts.push(CategoryCount {
                    category: product.category.clone(),
                    count: 1,
                });
            }
        }

        counts
    }

    /// Distinct category labels in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.category_counts()
            .into_iter()
            .map(|c| c.category)
            .collect()
    }
}
