//! Account management service: application-layer orchestration
//!
//! All account-related business logic lives here.
//! HTTP handlers should be thin wrappers that resolve the acting identity
//! and delegate to this service.

use std::sync::Arc;

use tokio::task;
use tracing::{debug, error, info};

use crate::domain::{
    Account, AccountError, AccountResult, AccountStore, AccountView, CredentialChecker,
    SearchQuery, SearchRequest, SearchResult,
};
use crate::shared::PageLimits;

/// Account service over an explicit store and credential checker.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    credentials: Arc<dyn CredentialChecker>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, credentials: Arc<dyn CredentialChecker>) -> Self {
        Self { store, credentials }
    }

    // ── Primitives ──────────────────────────────────────────────

    /// Pattern search. Zero matches is an empty page, not an error.
    pub async fn search(
        &self,
        username_pattern: &str,
        email_pattern: &str,
        page_size: u64,
        page: u64,
    ) -> AccountResult<SearchResult> {
        self.store
            .search(username_pattern, email_pattern, page_size, page)
            .await
    }

    /// `Ok(None)` is the canonical "not found".
    pub async fn get(&self, username: &str) -> AccountResult<Option<Account>> {
        self.store.find_by_name(username).await
    }

    pub async fn create(&self, account: Account) -> AccountResult<Account> {
        let created = self.store.insert(account).await?;
        info!(username = %created.username, "Account created");
        Ok(created)
    }

    /// Full-record replace by username.
    pub async fn update(&self, account: Account) -> AccountResult<Account> {
        let updated = self.store.update(account).await?;
        info!(username = %updated.username, "Account updated");
        Ok(updated)
    }

    pub async fn delete(&self, username: &str) -> AccountResult<()> {
        self.store.delete(username).await?;
        info!(username, "Account deleted");
        Ok(())
    }

    /// Runs on the blocking pool.
    pub async fn verify_credentials(&self, account: &Account, candidate: &str) -> bool {
        let credentials = Arc::clone(&self.credentials);
        let candidate = candidate.to_string();
        let hash = account.password_hash.clone();
        match task::spawn_blocking(move || credentials.verify(&candidate, &hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!("Credential check task failed: {}", e);
                false
            }
        }
    }

    /// Merge a view onto an account, hashing the new secret if one is set.
    /// The username is never taken from the view.
    pub async fn apply_view(&self, existing: Account, view: &AccountView) -> AccountResult<Account> {
        let new_hash = match view.new_password() {
            Some(secret) => Some(self.hash_secret(secret).await?),
            None => None,
        };
        Ok(existing.merge_view(view, new_hash))
    }

    async fn hash_secret(&self, secret: &str) -> AccountResult<String> {
        let credentials = Arc::clone(&self.credentials);
        let secret = secret.to_string();
        task::spawn_blocking(move || credentials.hash(&secret))
            .await
            .map_err(|e| AccountError::Store(format!("Hashing task failed: {}", e)))?
    }

    // ── Use-cases ───────────────────────────────────────────────

    /// Resolve and bound-check a search request, then query the store.
    /// Invalid paging never reaches the store.
    pub async fn search_accounts(
        &self,
        request: SearchRequest,
        limits: &PageLimits,
    ) -> AccountResult<(SearchQuery, SearchResult)> {
        let query = SearchQuery::from_request(request, limits)?;
        debug!(?query, "Searching accounts");
        let result = self
            .search(
                &query.username_pattern,
                &query.email_pattern,
                query.page_size,
                query.page,
            )
            .await?;
        Ok((query, result))
    }

    /// Existing account or `NotFound`.
    pub async fn require(&self, username: &str) -> AccountResult<Account> {
        self.get(username)
            .await?
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    /// Create `username` from `view`; the path username wins over the body.
    pub async fn create_account(&self, username: &str, mut view: AccountView) -> AccountResult<Account> {
        view.username = Some(username.to_string());
        view.valid(false)?;
        if view.new_password().is_none() {
            return Err(AccountError::field_required("password"));
        }

        let account = self.apply_view(Account::new(username, String::new()), &view).await?;
        self.create(account).await
    }

    /// Self-service update. A new secret is only accepted together with a
    /// `current_password` that verifies against the stored credential.
    pub async fn update_self(&self, username: &str, view: AccountView) -> AccountResult<Account> {
        let account = self.require(username).await?;
        view.valid(true)?;

        if view.new_password().is_some() {
            let current = view.current_password.as_deref().unwrap_or_default();
            if !self.verify_credentials(&account, current).await {
                info!(username, "Self-update rejected: current password mismatch");
                return Err(AccountError::InvalidCredentials);
            }
        }

        let account = self.apply_view(account, &view).await?;
        self.update(account).await
    }

    /// Administrative update; no credential re-check.
    pub async fn update_account(&self, username: &str, view: AccountView) -> AccountResult<Account> {
        view.valid(true)?;
        let account = self.require(username).await?;
        let account = self.apply_view(account, &view).await?;
        self.update(account).await
    }

    /// Delete and return the removed account's last state.
    pub async fn delete_account(&self, username: &str) -> AccountResult<Account> {
        let account = self.require(username).await?;
        self.delete(&account.username).await?;
        Ok(account)
    }
}
