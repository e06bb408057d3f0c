use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query string for paginated list endpoints. `name` narrows income and
/// expense listings by case-insensitive substring match.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub name: Option<String>,
}

impl PageQuery {
    /// Effective page number, 1-based. Zero is treated as the first page.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(10).max(1)
    }

    /// Row offset, widened so page * per_page cannot wrap. Clamped to
    /// `i64::MAX`, which any real listing reads as past-the-end.
    pub fn offset(&self) -> i64 {
        let offset = u64::from(self.page() - 1) * u64::from(self.per_page());
        i64::try_from(offset).unwrap_or(i64::MAX)
    }

    /// Filter term, if one was supplied and non-empty.
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }
}

/// Query string for the plain limit/offset listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LimitOffset {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LimitOffset {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pagination {
    pub count: usize,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(count: usize, query: &PageQuery, total: i64) -> Self {
        Self {
            count,
            page: query.page(),
            per_page: query.per_page(),
            total,
            total_pages: total_pages(total, query.per_page()),
        }
    }
}

/// ceil(total / per_page), floored at one page so empty listings still
/// report page 1 of 1.
fn total_pages(total: i64, per_page: u32) -> i64 {
    if total > 0 {
        let per_page = per_page as i64;
        (total + per_page - 1) / per_page
    } else {
        1
    }
}
