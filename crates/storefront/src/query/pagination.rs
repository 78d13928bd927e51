//! Page navigation over the filtered, sorted catalog.

/// Products shown per catalog page.
pub const PAGE_SIZE: usize = 25;

/// Number of pages needed for `count` results; never less than one.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    if count == 0 {
        1
    } else {
        count.div_ceil(PAGE_SIZE)
    }
}

/// The current catalog page (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PaginationState {
    /// Start on `page` (0 is read as 1). Pages past the end are clamped
    /// when the result is computed.
    #[must_use]
    pub const fn at(page: usize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
        }
    }

    /// Current page number, starting at 1.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Go back to the first page.
    pub const fn reset(&mut self) {
        self.page = 1;
    }

    /// Jump to `page`, clamped into `1..=total_pages`.
    pub fn go_to(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    /// Advance one page unless already on the last one.
    pub fn next(&mut self, total_pages: usize) {
        self.go_to(self.page.saturating_add(1), total_pages);
    }

    /// Step back one page unless already on the first one.
    pub fn prev(&mut self, total_pages: usize) {
        self.go_to(self.page.saturating_sub(1), total_pages);
    }

    /// Index range of the current page within a result of `count` items.
    ///
    /// The page is clamped against `count` first, so the range is always
    /// in bounds.
    #[must_use]
    pub fn window(&self, count: usize) -> std::ops::Range<usize> {
        let page = self.page.clamp(1, total_pages(count));
        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(count);
        start.min(count)..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(25), 1);
        assert_eq!(total_pages(26), 2);
        assert_eq!(total_pages(30), 2);
        assert_eq!(total_pages(50), 2);
        assert_eq!(total_pages(51), 3);
    }

    #[test]
    fn test_total_pages_formula() {
        for count in 0_usize..200 {
            let expected = 1.max(count.div_ceil(PAGE_SIZE));
            assert_eq!(total_pages(count), expected, "count = {count}");
        }
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut pagination = PaginationState::default();
        pagination.prev(3);
        assert_eq!(pagination.page(), 1);

        pagination.next(3);
        pagination.next(3);
        pagination.next(3);
        assert_eq!(pagination.page(), 3);

        pagination.go_to(0, 3);
        assert_eq!(pagination.page(), 1);

        pagination.go_to(99, 3);
        assert_eq!(pagination.page(), 3);

        pagination.reset();
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_go_to_with_no_results() {
        let mut pagination = PaginationState::default();
        pagination.go_to(5, 0);
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn test_at_clamps_late() {
        assert_eq!(PaginationState::at(0).page(), 1);
        let far = PaginationState::at(7);
        assert_eq!(far.page(), 7);
        assert_eq!(far.window(30), 25..30);
    }

    #[test]
    fn test_window() {
        let mut pagination = PaginationState::default();
        assert_eq!(pagination.window(30), 0..25);
        pagination.go_to(2, total_pages(30));
        assert_eq!(pagination.window(30), 25..30);
        assert_eq!(pagination.window(0), 0..0);
        // Stale page beyond the result is clamped to the last page
        assert_eq!(pagination.window(10), 0..10);
    }
}
