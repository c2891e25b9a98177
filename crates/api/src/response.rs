//! Shared response envelope types for API handlers.
//!
//! Single resources are returned as `{ "data": ... }`; paginated listings add
//! a `meta` block with the page position and totals.

use serde::Serialize;
use usogui_core::pagination::{PageMeta, PageRequest};

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "meta": { total, page, limit, total_pages } }`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: PageRequest, total: i64) -> Self {
        Self {
            data,
            meta: PageMeta::new(page, total),
        }
    }
}
