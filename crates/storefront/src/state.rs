//! Application state driven by user actions.
//!
//! [`AppState`] owns every piece of mutable storefront state and is the only
//! thing the shells talk to. Each entry point applies one state transition,
//! recomputes whatever view it affects and hands the result to the
//! [`Renderer`].

use tracing::{debug, instrument};
use vitrine_core::{CheckoutForm, Price, Product, ProductId};

use crate::cart::{CartStore, LocalStorage};
use crate::catalog::{ProductFeed, ProductStore};
use crate::checkout::{self, OrderConfirmation};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::query::{self, FilterState, PaginationState, QueryResult, SortSpec};
use crate::render::{CartSummary, CatalogPage, Notice, Renderer};

/// Storefront session state.
#[derive(Debug)]
pub struct AppState<S, R> {
    catalog: Option<ProductStore>,
    catalog_requested: bool,
    cart: CartStore<S>,
    filter: FilterState,
    sort: SortSpec,
    pagination: PaginationState,
    renderer: R,
}

impl<S: LocalStorage, R: Renderer> AppState<S, R> {
    /// Open the persisted cart and render it.
    ///
    /// The catalog starts out empty; call [`Self::load_catalog`] to fill it.
    pub fn new(storage: S, renderer: R) -> Self {
        let mut state = Self {
            catalog: None,
            catalog_requested: false,
            cart: CartStore::open(storage),
            filter: FilterState::default(),
            sort: SortSpec::default(),
            pagination: PaginationState::default(),
            renderer,
        };
        state.render_cart();
        state
    }

    /// Fetch the catalog and render the first page.
    ///
    /// On success the price bounds and category counts are rendered before
    /// the page itself.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyLoaded`] if called more than once, or
    /// [`AppError::Feed`] if the feed failed. A feed failure is rendered as a
    /// notice and leaves the catalog empty for the rest of the session.
    #[instrument(skip_all)]
    pub async fn load_catalog(&mut self, feed: &impl ProductFeed) -> Result<()> {
        if self.catalog_requested {
            return Err(AppError::AlreadyLoaded);
        }
        self.catalog_requested = true;

        match ProductStore::load(feed).await {
            Ok(store) => {
                self.renderer.price_bounds(store.price_bounds());
                self.renderer.category_counts(&store.category_counts());
                self.catalog = Some(store);
                self.pagination.reset();
                self.refresh();
                Ok(())
            }
            Err(e) => {
                let err = AppError::from(e);
                err.capture();
                self.renderer
                    .notice(&Notice::FeedUnavailable(err.user_message()));
                Err(err)
            }
        }
    }

    /// Change the search text.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.set_search(text);
        self.pagination.reset();
        self.refresh();
    }

    /// Change the price ceiling; `None` removes the constraint.
    pub fn set_price_ceiling(&mut self, ceiling: Option<Price>) {
        self.filter.set_price_ceiling(ceiling);
        self.pagination.reset();
        self.refresh();
    }

    /// Change the active category; `None` shows every category.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.set_category(category);
        self.pagination.reset();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.pagination.reset();
        self.refresh();
    }

    /// Clear every filter and the sort order.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
        self.sort = SortSpec::default();
        self.pagination.reset();
        self.refresh();
    }

    pub fn next_page(&mut self) {
        let total = self.query().total_pages;
        self.pagination.next(total);
        self.refresh();
    }

    pub fn prev_page(&mut self) {
        let total = self.query().total_pages;
        self.pagination.prev(total);
        self.refresh();
    }

    /// Jump to `page`, clamped to the pages that exist.
    pub fn go_to_page(&mut self, page: usize) {
        let total = self.query().total_pages;
        self.pagination.go_to(page, total);
        self.refresh();
    }

    /// Render the detail view of one product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CatalogUnavailable`] before the catalog is loaded,
    /// or [`AppError::NotFound`] for an unknown id.
    pub fn show_product(&mut self, id: ProductId) -> Result<()> {
        let product = Self::lookup(self.catalog.as_ref(), &mut self.renderer, id)?;
        self.renderer.product_detail(product);
        Ok(())
    }

    /// Add one unit of a catalog product to the cart and render the cart.
    ///
    /// Returns the product's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CatalogUnavailable`] or [`AppError::NotFound`] if
    /// the product cannot be resolved, and [`AppError::Storage`] if the cart
    /// could not be saved. In the last case the cart still holds the product.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<u32> {
        let product_id = id.to_string();
        add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));

        let product = Self::lookup(self.catalog.as_ref(), &mut self.renderer, id)?;
        let added = self.cart.add_item(product);
        self.render_cart();

        added.map_err(|e| {
            let err = AppError::from(e);
            err.capture();
            self.renderer.notice(&Notice::CartNotSaved(err.user_message()));
            err
        })
    }

    /// Place a mock order from the cart.
    ///
    /// If the stored cart cannot be emptied afterwards the order still
    /// stands: the confirmation is rendered and returned, followed by a
    /// "cart not saved" notice.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Checkout`] if the form is incomplete; the cart is
    /// unchanged.
    #[instrument(skip_all)]
    pub fn checkout(&mut self, form: &CheckoutForm) -> Result<OrderConfirmation> {
        add_breadcrumb("checkout", "Checkout submitted", None);

        let placed = match checkout::place_order(&mut self.cart, form) {
            Ok(placed) => placed,
            Err(e) => {
                self.renderer.notice(&Notice::CheckoutRejected(e.clone()));
                return Err(e.into());
            }
        };

        self.renderer
            .notice(&Notice::OrderPlaced(Box::new(placed.confirmation.clone())));
        if let Some(e) = placed.cart_error {
            let err = AppError::from(e);
            err.capture();
            self.renderer.notice(&Notice::CartNotSaved(err.user_message()));
        }
        self.render_cart();
        Ok(placed.confirmation)
    }

    /// Run the query pipeline over the current state.
    #[must_use]
    pub fn query(&self) -> QueryResult<'_> {
        query::compute(self.products(), &self.filter, self.sort, &self.pagination)
    }

    /// Catalog products in feed order; empty until loaded.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.catalog.as_ref().map_or(&[][..], ProductStore::products)
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&ProductStore> {
        self.catalog.as_ref()
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    #[must_use]
    pub const fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Re-render the cart.
    pub fn render_cart(&mut self) {
        self.renderer.cart(&CartSummary::of(&self.cart));
    }

    /// Re-render the category sidebar.
    ///
    /// Counts always cover the whole catalog, whatever the filters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CatalogUnavailable`] before the catalog is loaded.
    pub fn render_categories(&mut self) -> Result<()> {
        let catalog = self.catalog.as_ref().ok_or(AppError::CatalogUnavailable)?;
        self.renderer.category_counts(&catalog.category_counts());
        Ok(())
    }

    /// Resolve a catalog product, rendering a notice when it cannot be.
    fn lookup<'a>(
        catalog: Option<&'a ProductStore>,
        renderer: &mut R,
        id: ProductId,
    ) -> Result<&'a Product> {
        let Some(catalog) = catalog else {
            let err = AppError::CatalogUnavailable;
            renderer.notice(&Notice::FeedUnavailable(err.user_message()));
            return Err(err);
        };
        catalog.get(id).ok_or_else(|| {
            renderer.notice(&Notice::ProductNotFound(id));
            AppError::NotFound(id)
        })
    }

    /// Recompute the current page and render it.
    ///
    /// The page actually shown is written back, so a stale page number never
    /// outlives the filter change that made it invalid.
    fn refresh(&mut self) {
        let products = self.catalog.as_ref().map_or(&[][..], ProductStore::products);
        let result = query::compute(products, &self.filter, self.sort, &self.pagination);
        debug!(
            page = result.page,
            total_pages = result.total_pages,
            matched = result.total_count,
            "catalog recomputed"
        );
        self.pagination.go_to(result.page, result.total_pages);
        self.renderer.catalog(&CatalogPage {
            result: &result,
            filter: &self.filter,
            sort: self.sort,
        });
    }
}
