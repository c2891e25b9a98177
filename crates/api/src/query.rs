//! Shared query parameter types for API handlers.

use serde::Deserialize;
use usogui_core::pagination::PageRequest;

/// Page-based pagination parameters (`?page=&limit=`).
///
/// Values are clamped by [`PageRequest::new`]: page floors at 1 and limit
/// is kept within `1..=100`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Reader context parameters accepted by every public read endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ReaderParams {
    /// ISO 639-1 language code for the translation overlay.
    pub lang: Option<String>,
    /// Explicit chapter progress; overrides the stored progress of the caller.
    pub progress: Option<i32>,
}

/// `?search=` on list endpoints that support free-text filtering.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

impl SearchParams {
    /// The search term, or `None` when absent or blank.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
