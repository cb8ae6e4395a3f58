//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for offset-paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request, clamping page to >= 1 and limit to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u64, limit: u64) -> Self {
        Self::bounded(page, limit, MAX_PAGE_SIZE)
    }

    /// Create a new page request with a caller-chosen upper bound.
    pub fn bounded(page: u64, limit: u64, max_limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, max_limit.max(1)),
        }
    }

    /// Calculate the SQL `OFFSET` value. Saturates instead of overflowing
    /// for absurd page numbers.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// [`Self::offset`] clamped into the range PostgreSQL accepts.
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset()).unwrap_or(i64::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination block returned next to a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page number (1-based).
    pub current_page: u64,
    /// `ceil(total_count / limit)`; zero when there are no items.
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_count: u64,
    /// Number of items per page.
    pub limit: u64,
}

impl PageInfo {
    /// Build the pagination block for a request and a total count.
    pub fn new(request: &PageRequest, total_count: u64) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_count.div_ceil(request.limit.max(1)),
            total_count,
            limit: request.limit,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_inputs() {
        let req = PageRequest::new(0, 10_000);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, MAX_PAGE_SIZE);

        let req = PageRequest::new(3, 0);
        assert_eq!(req.limit, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(2, 10).offset(), 10);
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        let req = PageRequest::new(u64::MAX, MAX_PAGE_SIZE);
        assert_eq!(req.offset(), u64::MAX);
        assert_eq!(req.sql_offset(), i64::MAX);

        let req = PageRequest::new(1_000_000_000_000_000_000, MAX_PAGE_SIZE);
        assert_eq!(req.sql_offset(), i64::MAX);
        assert_eq!(PageRequest::new(3, 10).sql_offset(), 20);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let req = PageRequest::new(2, 10);
        assert_eq!(PageInfo::new(&req, 25).total_pages, 3);
        assert_eq!(PageInfo::new(&req, 20).total_pages, 2);
        assert_eq!(PageInfo::new(&req, 0).total_pages, 0);
    }

    #[test]
    fn test_page_info_wire_names() {
        let info = PageInfo::new(&PageRequest::new(1, 10), 4);
        let json = serde_json::to_value(info).expect("serialize");
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalCount"], 4);
        assert_eq!(json["limit"], 10);
    }
}
