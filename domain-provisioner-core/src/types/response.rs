//! Pagination wrapper

use serde::{Deserialize, Serialize};

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Current page (starting at 1)
    pub page: u64,
    pub per_page: u64,
    pub total_count: u64,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    #[must_use]
    pub fn new(items: Vec<T>, page: u64, per_page: u64, total_count: u64) -> Self {
        let has_more = page.saturating_mul(per_page) < total_count;
        Self {
            items,
            page,
            per_page,
            total_count,
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_until_last_page() {
        assert!(PaginatedResponse::new(vec![1, 2], 1, 2, 3).has_more);
        assert!(!PaginatedResponse::new(vec![3], 2, 2, 3).has_more);
        assert!(!PaginatedResponse::<i32>::new(vec![], 1, 50, 0).has_more);
    }
}
