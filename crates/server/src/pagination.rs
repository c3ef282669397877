//! Shared pagination shapes for list endpoints.

use serde::{Deserialize, Serialize};

/// A page of results.
///
/// `page` is 1-based; `total_pages` is at least 1 even for an empty set
/// so pagination controls always have something to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: i64,
    /// Total number of pages.
    pub total_pages: i64,
    /// Total number of matching items across all pages.
    pub total: i64,
}

impl<T> Page<T> {
    /// Assemble a page from a fetched slice and the overall count.
    #[must_use]
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        Self {
            items,
            page: page.max(1),
            total_pages: total_pages(total, per_page),
            total,
        }
    }
}

/// Number of pages needed for `total` items at `per_page` each.
#[must_use]
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// Clamp a requested page number to 1-based and derive the row offset.
#[must_use]
pub fn page_offset(page: Option<i64>, per_page: i64) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    (page, (page - 1) * per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(41, 20), 3);
    }

    #[test]
    fn test_page_offset_clamps_to_first_page() {
        assert_eq!(page_offset(None, 20), (1, 0));
        assert_eq!(page_offset(Some(0), 20), (1, 0));
        assert_eq!(page_offset(Some(-3), 20), (1, 0));
        assert_eq!(page_offset(Some(3), 20), (3, 40));
    }

    #[test]
    fn test_page_shape() {
        let page = Page::new(vec![1, 2, 3], 2, 10, 23);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total, 23);
        assert_eq!(page.items.len(), 3);
    }
}
