//! Shared response envelope types for API handlers.

use classifieds_core::pagination::Page;
use serde::Serialize;

/// `{ "items": [...], "num_page": N, "total": M }` body of paginated listings.
///
/// `num_page` is the total number of pages, not the current page.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub items: Vec<T>,
    pub num_page: usize,
    pub total: usize,
}

impl<T: Serialize> From<Page<T>> for PageResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            items: page.items,
            num_page: page.page_count,
            total: page.total_count,
        }
    }
}

/// `{ "status": "ok" }` acknowledgement returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
