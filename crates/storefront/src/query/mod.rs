//! The catalog query pipeline.
//!
//! [`compute`] derives the page to display from the catalog and the three
//! pieces of user-selected state, in a fixed order:
//!
//! 1. **Filter** - keep products passing [`FilterState::matches`]
//! 2. **Sort** - order them by [`SortSpec`] (stable)
//! 3. **Paginate** - cut out the [`PAGE_SIZE`] window of the current page
//!
//! The function is pure: it reads its inputs and allocates only the result.

mod filter;
mod pagination;
mod sort;

pub use filter::FilterState;
pub use pagination::{PAGE_SIZE, PaginationState, total_pages};
pub use sort::SortSpec;

use vitrine_core::Product;

/// One page of query results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<'a> {
    /// Products on the current page, in display order.
    pub items: Vec<&'a Product>,
    /// Page actually shown, clamped into `1..=total_pages`.
    pub page: usize,
    /// Number of pages for the filtered result (at least 1).
    pub total_pages: usize,
    /// Number of products passing the filter, across all pages.
    pub total_count: usize,
}

impl QueryResult<'_> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Run the filter, sort and paginate steps over `products`.
#[must_use]
pub fn compute<'a>(
    products: &'a [Product],
    filter: &FilterState,
    sort: SortSpec,
    pagination: &PaginationState,
) -> QueryResult<'a> {
    let mut matched: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    sort.apply(&mut matched);

    let total_count = matched.len();
    let total_pages = total_pages(total_count);
    let page = pagination.page().clamp(1, total_pages);
    let window = pagination.window(total_count);

    let items = matched.get(window).map(<[_]>::to_vec).unwrap_or_default();

    QueryResult {
        items,
        page,
        total_pages,
        total_count,
    }
}
