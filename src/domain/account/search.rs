use crate::domain::{Account, AccountError, AccountResult};
use crate::shared::PageLimits;

/// Pattern that matches everything.
pub const MATCH_ALL: &str = "*";

/// Raw search input; every field optional.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Search input after defaults and bounds have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub username_pattern: String,
    pub email_pattern: String,
    pub page_size: u64,
    pub page: u64,
}

impl SearchQuery {
    /// Fill defaults, reject non-positive page size or page number, and
    /// clamp the page size to the configured maximum.
    pub fn from_request(request: SearchRequest, limits: &PageLimits) -> AccountResult<Self> {
        let page_size = request.limit.unwrap_or(limits.default_page_size as i64);
        if page_size <= 0 {
            return Err(AccountError::validation(
                "limit",
                "page size must be a positive number",
            ));
        }
        let page_size = (page_size as u64).min(limits.max_page_size);

        let page = request.page.unwrap_or(1);
        if page <= 0 {
            return Err(AccountError::validation(
                "page",
                "page must be a positive number",
            ));
        }

        Ok(Self {
            username_pattern: request.username.unwrap_or_else(|| MATCH_ALL.to_string()),
            email_pattern: request.email.unwrap_or_else(|| MATCH_ALL.to_string()),
            page_size,
            page: page as u64,
        })
    }
}

/// One page of matching accounts plus the total match count.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub accounts: Vec<Account>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> PageLimits {
        PageLimits {
            default_page_size: 20,
            max_page_size: 100,
        }
    }

    #[test]
    fn defaults_match_everything_on_first_page() {
        let query = SearchQuery::from_request(SearchRequest::default(), &limits()).unwrap();
        assert_eq!(query.username_pattern, "*");
        assert_eq!(query.email_pattern, "*");
        assert_eq!(query.page_size, 20);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn oversized_page_is_clamped() {
        for limit in [101, 500, i64::MAX] {
            let request = SearchRequest {
                limit: Some(limit),
                ..Default::default()
            };
            let query = SearchQuery::from_request(request, &limits()).unwrap();
            assert_eq!(query.page_size, 100);
        }
    }

    #[test]
    fn non_positive_page_size_rejected() {
        for limit in [0, -1, i64::MIN] {
            let request = SearchRequest {
                limit: Some(limit),
                ..Default::default()
            };
            let err = SearchQuery::from_request(request, &limits()).unwrap_err();
            assert_eq!(
                err,
                AccountError::validation("limit", "page size must be a positive number")
            );
        }
    }

    #[test]
    fn non_positive_page_rejected() {
        for page in [0, -3] {
            let request = SearchRequest {
                page: Some(page),
                ..Default::default()
            };
            let err = SearchQuery::from_request(request, &limits()).unwrap_err();
            assert_eq!(
                err,
                AccountError::validation("page", "page must be a positive number")
            );
        }
    }

    #[test]
    fn explicit_patterns_are_kept() {
        let request = SearchRequest {
            username: Some("adm*".into()),
            email: Some("*@example.com".into()),
            limit: Some(5),
            page: Some(3),
        };
        let query = SearchQuery::from_request(request, &limits()).unwrap();
        assert_eq!(
            query,
            SearchQuery {
                username_pattern: "adm*".into(),
                email_pattern: "*@example.com".into(),
                page_size: 5,
                page: 3,
            }
        );
    }
}
