//! Page-number pagination over an in-memory collection.
//!
//! Page numbers are 1-based. Requests outside the valid range clamp to the
//! first or last page instead of failing, and an empty collection still has
//! one (empty) page.

use std::num::IntErrorKind;

use crate::error::CoreError;

/// Default number of items per page when `PAGE_SIZE` is not configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A single page of results plus the metadata needed to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based number of the page actually returned (after clamping).
    pub number: usize,
    pub page_count: usize,
    /// Size of the collection before slicing.
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Transform every item while keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            page_count: self.page_count,
            total_count: self.total_count,
        }
    }
}

/// Slices collections into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    /// Create a paginator. `page_size` must be at least 1.
    pub fn new(page_size: usize) -> Result<Self, CoreError> {
        if page_size == 0 {
            return Err(CoreError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `total` items. Never less than 1.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Clamp a requested page number into `1..=page_count`.
    ///
    /// `None` (absent or unparseable) resolves to the first page.
    pub fn resolve_page(&self, requested: Option<i64>, total: usize) -> usize {
        let last = self.page_count(total);
        match requested {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => usize::try_from(n).map_or(last, |n| n.min(last)),
        }
    }

    /// Return the requested page of `items`.
    pub fn paginate<T>(&self, items: Vec<T>, requested: Option<i64>) -> Page<T> {
        let total_count = items.len();
        let page_count = self.page_count(total_count);
        let number = self.resolve_page(requested, total_count);

        let start = (number - 1) * self.page_size;
        let items: Vec<T> = items.into_iter().skip(start).take(self.page_size).collect();

        Page {
            items,
            number,
            page_count,
            total_count,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Parse a raw `page` query value. Anything that is not an integer yields `None`.
///
/// Integers outside the `i64` range saturate, so they still clamp to the
/// first or last page.
pub fn parse_page_number(raw: Option<&str>) -> Option<i64> {
    match raw?.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
