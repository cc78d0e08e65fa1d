use serde::Serialize;

use crate::database::store::RecordFields;

/// Pagination envelope returned by the list endpoint
#[derive(Debug, Serialize)]
pub struct Page {
    pub items: Vec<RecordFields>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl Page {
    pub fn new(items: Vec<RecordFields>, total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
