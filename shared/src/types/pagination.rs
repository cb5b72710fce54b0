//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 20;
const MIN_PER_PAGE: u32 = 1;
const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters for list endpoints
///
/// Out-of-range input is clamped, never rejected: `page` is at least 1 and
/// `per_page` is kept within [1, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Current page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Number of items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            per_page: per_page.clamp(MIN_PER_PAGE, MAX_PER_PAGE),
        }
    }

    /// Calculate the offset (skip) for database queries
    pub fn offset(&self) -> u32 {
        (self.page.saturating_sub(1)) * self.per_page
    }

    /// Get the limit (take) for database queries
    pub fn limit(&self) -> u32 {
        self.per_page
    }

    /// Calculate offset as i64 for SQL queries
    pub fn offset_i64(&self) -> i64 {
        self.offset() as i64
    }

    /// Calculate limit as i64 for SQL queries
    pub fn limit_i64(&self) -> i64 {
        self.limit() as i64
    }

    /// Check if this is the first page
    pub fn is_first_page(&self) -> bool {
        self.page == 1
    }

    /// Total number of pages for a given item count
    pub fn total_pages(&self, total: u64) -> u32 {
        total_pages(total, self.per_page)
    }
}

/// Paginated result envelope with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// The items on this page
    pub items: Vec<T>,

    /// Total number of items across all pages
    pub total_count: u64,

    /// Current page number
    pub page: u32,

    /// Items per page
    pub per_page: u32,

    /// Total number of pages
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    ///
    /// Items beyond the page window are dropped so `items.len()` never
    /// exceeds `per_page`.
    pub fn new(mut items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        items.truncate(request.per_page as usize);

        Self {
            items,
            total_count,
            page: request.page,
            per_page: request.per_page,
            total_pages: request.total_pages(total_count),
        }
    }

    /// Create an empty paginated result
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: request.page,
            per_page: request.per_page,
            total_pages: 0,
        }
    }

    /// Whether a following page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Transform the items using a function
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }

    /// Check if this page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Builds an RFC 5988 `Link` header value for a paginated listing
///
/// Emits `prev` and `first` links when a previous page exists, `next` and
/// `last` links when a following page exists, each as `<url>; rel="..."`,
/// comma-joined. Returns an empty string when the listing fits on a single
/// page. The total count itself travels in a separate count header supplied
/// by the caller.
pub fn build_link_header(page: u32, per_page: u32, total: u64, base_url: &str) -> String {
    let request = PageRequest::new(page, per_page);
    let total_pages = request.total_pages(total);
    let mut links = Vec::new();

    if request.page > 1 {
        links.push(page_link(base_url, request.page - 1, request.per_page, "prev"));
        links.push(page_link(base_url, 1, request.per_page, "first"));
    }
    if request.page < total_pages {
        links.push(page_link(base_url, request.page + 1, request.per_page, "next"));
        links.push(page_link(base_url, total_pages, request.per_page, "last"));
    }

    links.join(", ")
}

fn page_link(base_url: &str, page: u32, per_page: u32, rel: &str) -> String {
    format!(
        "<{}?page={}&per_page={}>; rel=\"{}\"",
        base_url, page, per_page, rel
    )
}

fn total_pages(total: u64, per_page: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((total + per_page as u64 - 1) / per_page as u64) as u32
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
