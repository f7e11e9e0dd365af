//! Offset pagination types for list endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_PER_PAGE: u32 = 50;
const MAX_PER_PAGE: u32 = 100;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Returns the 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the page size clamped to [1, 100].
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Returns the SQL offset for this page.
    pub fn offset(&self) -> i64 {
        ((self.page() - 1) * self.per_page()) as i64
    }

    /// Returns the SQL limit for this page.
    pub fn limit(&self) -> i64 {
        self.per_page() as i64
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl PageMeta {
    pub fn new(query: &PageQuery, total: i64) -> Self {
        Self {
            page: query.page(),
            per_page: query.per_page(),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 50);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let query = PageQuery {
            page: Some(0),
            per_page: Some(10_000),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
    }

    #[test]
    fn test_offset_for_later_page() {
        let query = PageQuery {
            page: Some(3),
            per_page: Some(20),
        };
        assert_eq!(query.offset(), 40);
        assert_eq!(query.limit(), 20);
    }

    #[test]
    fn test_meta_echoes_clamped_values() {
        let query = PageQuery {
            page: Some(2),
            per_page: Some(500),
        };
        let meta = PageMeta::new(&query, 42);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.per_page, 100);
        assert_eq!(meta.total, 42);
    }
}
