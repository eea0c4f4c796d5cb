//! Account DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Account, AccountView, SearchRequest};

/// Account API representation. Never carries the credential hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(a: Account) -> Self {
        Self {
            username: a.username,
            email: a.email,
            display_name: a.display_name,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Create / update request body.
///
/// On create the path username wins over `username`; on update
/// `username` is ignored. An absent or empty `password` leaves the stored
/// credential unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AccountViewRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    /// Required by self-update when `password` is set
    pub current_password: Option<String>,
}

impl From<AccountViewRequest> for AccountView {
    fn from(r: AccountViewRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            display_name: r.display_name,
            current_password: r.current_password,
        }
    }
}

/// Search request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchAccountsRequest {
    /// Username pattern, `*` as wildcard (default `*`)
    pub username: Option<String>,
    /// Email pattern, `*` as wildcard (default `*`)
    pub email: Option<String>,
    /// Page size; clamped to the configured maximum
    pub limit: Option<i64>,
    /// 1-based page number (default 1)
    pub page: Option<i64>,
}

impl From<SearchAccountsRequest> for SearchRequest {
    fn from(r: SearchAccountsRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            limit: r.limit,
            page: r.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dto_never_serializes_secrets() {
        let mut account = Account::new("alice", "alice@example.com");
        account.password_hash = "$2b$04$abcdefghijklmnopqrstuv".into();

        let json = serde_json::to_value(AccountDto::from(account)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("display_name"));
        assert_eq!(object["username"], "alice");
    }

    #[test]
    fn search_body_fields_are_optional() {
        let request: SearchAccountsRequest = serde_json::from_str(r#"{"limit": 0}"#).unwrap();
        assert_eq!(request.limit, Some(0));
        assert!(request.username.is_none());
        assert!(request.page.is_none());
    }
}
