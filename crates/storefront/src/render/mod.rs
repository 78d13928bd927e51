//! The rendering sink.
//!
//! The storefront never builds display text itself. After every state change
//! it hands structured data to a [`Renderer`]; how that data is presented is
//! entirely the renderer's business.

mod text;

pub use text::TextRenderer;

use rust_decimal::Decimal;
use vitrine_core::{CartLine, CheckoutError, Product, ProductId};

use crate::cart::{CartStore, LocalStorage};
use crate::catalog::{CategoryCount, PriceBounds};
use crate::checkout::OrderConfirmation;
use crate::query::{FilterState, QueryResult, SortSpec};

/// Everything the catalog view shows.
#[derive(Debug, Clone, Copy)]
pub struct CatalogPage<'a> {
    pub result: &'a QueryResult<'a>,
    pub filter: &'a FilterState,
    pub sort: SortSpec,
}

/// Everything the cart view shows.
#[derive(Debug, Clone, Copy)]
pub struct CartSummary<'a> {
    pub lines: &'a [CartLine],
    pub item_count: u64,
    pub total: Decimal,
}

impl<'a> CartSummary<'a> {
    /// Summarize the current contents of `cart`.
    #[must_use]
    pub fn of<S: LocalStorage>(cart: &'a CartStore<S>) -> Self {
        Self {
            lines: cart.snapshot(),
            item_count: cart.total_item_count(),
            total: cart.total_price(),
        }
    }
}

/// One-off messages for the user.
#[derive(Debug, Clone)]
pub enum Notice {
    /// The product feed could not be loaded.
    FeedUnavailable(String),
    /// A product id did not resolve.
    ProductNotFound(ProductId),
    /// The cart changed in memory but could not be written to storage.
    CartNotSaved(String),
    /// The checkout form was incomplete.
    CheckoutRejected(CheckoutError),
    /// A (mock) order was placed.
    OrderPlaced(Box<OrderConfirmation>),
}

/// Presentation layer consuming storefront state.
pub trait Renderer {
    /// Current page of the catalog.
    fn catalog(&mut self, page: &CatalogPage<'_>);

    /// Full cart with totals.
    fn cart(&mut self, cart: &CartSummary<'_>);

    /// A single product in full.
    fn product_detail(&mut self, product: &Product);

    /// Per-category product counts for the sidebar.
    fn category_counts(&mut self, counts: &[CategoryCount]);

    /// Range for the price control; `None` for an empty catalog.
    fn price_bounds(&mut self, bounds: Option<PriceBounds>);

    /// A message for the user.
    fn notice(&mut self, notice: &Notice);
}
