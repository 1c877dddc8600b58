//! Fixed-size pagination of ordered listings.
//!
//! The store is asked for the total first, [`Paginator::window`] turns the
//! requested page into an offset/limit pair, and [`Page`] wraps the fetched
//! items with the metadata templates need.

use serde::Serialize;

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Splits listings into pages of `per_page` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Paginator {
    /// A page size of zero falls back to [`DEFAULT_PER_PAGE`].
    pub fn new(per_page: u64) -> Self {
        if per_page == 0 {
            return Self::default();
        }
        Self { per_page }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages for `total` items. Never zero.
    pub fn num_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page).max(1)
    }

    /// Resolve the raw `page` query value against `total` items.
    ///
    /// Absent or non-numeric values select page 1; out-of-range numbers clamp
    /// to the first or last page.
    pub fn window(&self, total: u64, requested: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = requested
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(|n| n.clamp(1, num_pages as i64) as u64)
            .unwrap_or(1);

        PageWindow {
            number,
            num_pages,
            total,
            per_page: self.per_page,
        }
    }
}

/// The slice of a listing selected by a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total: window.total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the items while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
        }
    }
}
