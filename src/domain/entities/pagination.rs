use std::collections::HashMap;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// 1-based page window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: 1, limit: DEFAULT_PAGE_LIMIT }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Pagination {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Reads `page` and `limit` from a query string map; unparseable values
    /// fall back to the defaults.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let page = query.get("page").and_then(|v| v.parse::<u32>().ok());
        let limit = query.get("limit").and_then(|v| v.parse::<u32>().ok());
        Self::new(page, limit)
    }

    pub fn offset(&self) -> i64 {
        let page = self.page.saturating_sub(1);
        (page as i64) * (self.limit as i64)
    }

    pub fn total_pages(&self, total: i64) -> u32 {
        if total <= 0 {
            return 0;
        }
        let limit = self.limit as i64;
        ((total + limit - 1) / limit) as u32
    }
}
