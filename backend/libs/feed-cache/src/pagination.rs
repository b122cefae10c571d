//! Page/page-size normalization shared by the feed and tweet listings

use std::fmt;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Normalized pagination request.
///
/// Both fields are always positive: invalid inputs fall back to the defaults
/// instead of being rejected. `new` and `from_query` are the only ways in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Build from raw query-string values; anything unparsable counts as absent.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_lenient(page), parse_lenient(limit))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`
    pub fn page_count(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        total / self.limit + i64::from(total % self.limit != 0)
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.page, self.limit)
    }
}

fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}
