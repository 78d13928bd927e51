//! Catalog filters: search text, price ceiling and category.

use vitrine_core::{Price, Product};

/// The active catalog filters.
///
/// Every constraint is optional; the default state matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    /// Lowercased copy of `search`, computed once per edit.
    needle: String,
    price_ceiling: Option<Price>,
    category: Option<String>,
}

impl FilterState {
    /// Search text as entered.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Inclusive upper price bound, if any.
    #[must_use]
    pub const fn price_ceiling(&self) -> Option<Price> {
        self.price_ceiling
    }

    /// Active category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether no constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty() && self.price_ceiling.is_none() && self.category.is_none()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.needle = self.search.to_lowercase();
    }

    pub const fn set_price_ceiling(&mut self, ceiling: Option<Price>) {
        self.price_ceiling = ceiling;
    }

    /// Set the category; an empty label clears it.
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    /// Whether `product` passes every active constraint.
    ///
    /// Prices are never negative, so the floor of the price range needs no check.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product) && self.matches_price(product) && self.matches_category(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        self.needle.is_empty() || product.name.to_lowercase().contains(&self.needle)
    }

    fn matches_price(&self, product: &Product) -> bool {
        self.price_ceiling
            .is_none_or(|ceiling| product.price <= ceiling)
    }

    fn matches_category(&self, product: &Product) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| product.category == category)
    }
}
