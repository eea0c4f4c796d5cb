//! In-memory storage implementation

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{Account, AccountError, AccountResult, AccountStore, SearchResult};
use crate::shared::{matches_pattern, page_offset};

/// In-memory account store for development and testing
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<String, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_name(&self, username: &str) -> AccountResult<Option<Account>> {
        Ok(self.accounts.get(username).map(|a| a.clone()))
    }

    async fn search(
        &self,
        username_pattern: &str,
        email_pattern: &str,
        limit: u64,
        page: u64,
    ) -> AccountResult<SearchResult> {
        let mut matching: Vec<Account> = self
            .accounts
            .iter()
            .filter(|e| {
                matches_pattern(username_pattern, &e.username)
                    && matches_pattern(email_pattern, &e.email)
            })
            .map(|e| e.value().clone())
            .collect();
        matching.sort_by(|a, b| a.username.cmp(&b.username));

        let total = matching.len() as u64;
        let offset = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let accounts = matching.into_iter().skip(offset).take(limit).collect();

        Ok(SearchResult { accounts, total })
    }

    async fn insert(&self, mut account: Account) -> AccountResult<Account> {
        match self.accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(AccountError::Conflict(account.username)),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                account.created_at = now;
                account.updated_at = now;
                slot.insert(account.clone());
                Ok(account)
            }
        }
    }

    async fn update(&self, mut account: Account) -> AccountResult<Account> {
        let Some(mut stored) = self.accounts.get_mut(&account.username) else {
            return Err(AccountError::NotFound(account.username));
        };
        account.created_at = stored.created_at;
        account.updated_at = Utc::now();
        *stored = account.clone();
        Ok(account)
    }

    async fn delete(&self, username: &str) -> AccountResult<()> {
        self.accounts
            .remove(username)
            .ok_or_else(|| AccountError::NotFound(username.to_string()))?;
        Ok(())
    }
}
