//! Pagination normalization for list endpoints
//!
//! Caller-supplied `page` / `page_size` are never rejected: absent or out of
//! range values are corrected before the query runs.
//!
//! | input                  | result          |
//! |------------------------|-----------------|
//! | page absent / negative | 0               |
//! | page_size absent / 0   | 10              |
//! | page_size negative     | 10              |
//! | page_size > 50         | 50 (clamped)    |

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Canonical, bounded paging parameters.
///
/// **Invariant:** `page >= 0` and `1 <= page_size <= MAX_PAGE_SIZE`.
/// Only obtainable through [`Pagination::normalize`] or `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pagination {
    page: i64,
    page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Normalize raw paging input. Total and idempotent.
    pub fn normalize(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 0 => p,
            _ => DEFAULT_PAGE,
        };
        let page_size = match page_size {
            Some(s) if s > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
            Some(s) if s >= 1 => s,
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip: `page * page_size`, saturating on huge pages.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.page_size)
    }

    /// Rows to fetch.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn into_parts(self) -> (i64, i64) {
        (self.page, self.page_size)
    }
}

/// `?page=&page_size=` as embedded in every list request DTO.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn normalize(&self) -> Pagination {
        Pagination::normalize(self.page, self.page_size)
    }
}

impl From<Pagination> for PageQuery {
    fn from(p: Pagination) -> Self {
        Self {
            page: Some(p.page),
            page_size: Some(p.page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Pagination::normalize(None, None).into_parts(), (0, 10));
        assert_eq!(Pagination::default().into_parts(), (0, 10));
    }

    #[test]
    fn test_invalid_values_replaced() {
        assert_eq!(Pagination::normalize(Some(-5), Some(0)).into_parts(), (0, 10));
        assert_eq!(Pagination::normalize(Some(2), Some(-3)).into_parts(), (2, 10));
    }

    #[test]
    fn test_valid_values_pass_through() {
        assert_eq!(Pagination::normalize(Some(3), Some(25)).into_parts(), (3, 25));
        assert_eq!(Pagination::normalize(Some(0), Some(1)).into_parts(), (0, 1));
        assert_eq!(Pagination::normalize(Some(0), Some(50)).into_parts(), (0, 50));
    }

    #[test]
    fn test_page_size_clamped_to_max() {
        assert_eq!(Pagination::normalize(Some(0), Some(51)).into_parts(), (0, 50));
        assert_eq!(
            Pagination::normalize(None, Some(i64::MAX)).into_parts(),
            (0, 50)
        );
    }

    #[test]
    fn test_offset_and_limit() {
        let p = Pagination::normalize(Some(3), Some(20));
        assert_eq!(p.offset(), 60);
        assert_eq!(p.limit(), 20);

        let huge = Pagination::normalize(Some(i64::MAX), Some(50));
        assert_eq!(huge.offset(), i64::MAX);
    }

    #[test]
    fn test_page_query_deserialize() {
        let q: PageQuery = serde_json::from_str(r#"{"page":2,"page_size":100}"#).unwrap();
        assert_eq!(q.normalize().into_parts(), (2, 50));

        let empty: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, PageQuery::default());
        assert_eq!(empty.normalize().into_parts(), (0, 10));
    }

    #[test]
    fn test_idempotent_over_edge_inputs() {
        let inputs = [
            None,
            Some(i64::MIN),
            Some(-1),
            Some(0),
            Some(1),
            Some(10),
            Some(50),
            Some(51),
            Some(i64::MAX),
        ];
        for page in inputs {
            for page_size in inputs {
                let once = Pagination::normalize(page, page_size);
                let twice = PageQuery::from(once).normalize();
                assert_eq!(once, twice, "not idempotent for {:?}/{:?}", page, page_size);
            }
        }
    }
}
