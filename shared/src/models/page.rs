//! Pagination envelope

use serde::{Deserialize, Serialize};

/// One page of a filtered listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total rows matching the filter, across all pages
    pub total: i64,
    pub page: i32,
    pub per_page: i32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i32, per_page: i32) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
        }
    }
}
