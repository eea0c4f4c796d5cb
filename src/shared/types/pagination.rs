/// Default number of accounts per search page
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Upper bound a search page size is clamped to
pub const MAX_PAGE_SIZE: u64 = 100;

/// Process-wide page size bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Zero-based row offset of a 1-based page.
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(page_size)
}
