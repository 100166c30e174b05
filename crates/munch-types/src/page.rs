//! Pagination primitives
//!
//! Every listing endpoint takes `page` + `limit` query parameters and
//! responds with `{items, total}`, where `total` counts all matches
//! regardless of the requested window.

use serde::Serialize;

/// A pagination window: zero-based page index and per-page limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Default number of items per page
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Hard cap on items per page
    pub const MAX_LIMIT: u32 = 100;

    /// Build a window from optional query values, applying defaults and cap
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(0),
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT),
        }
    }

    /// Number of items to skip before this window starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Paged<T> {
    /// Map the items while keeping the total
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.page, 0);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_offset() {
        let page = Page::new(Some(3), Some(25));
        assert_eq!(page.offset(), 75);
    }

    #[test]
    fn test_limit_capped() {
        let page = Page::new(None, Some(10_000));
        assert_eq!(page.limit, Page::MAX_LIMIT);
    }

    #[test]
    fn test_paged_map_keeps_total() {
        let paged = Paged {
            items: vec![1, 2, 3],
            total: 42,
        };
        let mapped = paged.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, 42);
    }
}
