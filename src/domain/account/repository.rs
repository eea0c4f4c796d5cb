use async_trait::async_trait;

use super::{Account, SearchResult};
use crate::domain::AccountResult;

/// Persistence port for accounts.
///
/// Lookups report absence with `None`; `update` and `delete` return
/// `AccountError::NotFound` when the username is not stored, and `insert`
/// returns `AccountError::Conflict` when it already is.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_name(&self, username: &str) -> AccountResult<Option<Account>>;

    /// Case-insensitive `*` pattern search, ordered by username.
    /// `page` is 1-based.
    async fn search(
        &self,
        username_pattern: &str,
        email_pattern: &str,
        limit: u64,
        page: u64,
    ) -> AccountResult<SearchResult>;

    async fn insert(&self, account: Account) -> AccountResult<Account>;
    async fn update(&self, account: Account) -> AccountResult<Account>;
    async fn delete(&self, username: &str) -> AccountResult<()>;
}
