use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{Account, AccountError, AccountResult, AccountStore, SearchResult};
use crate::infrastructure::database::entities::account;
use crate::shared::{page_offset, to_like_pattern, LIKE_ESCAPE};

/// SeaORM-backed [`AccountStore`]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn account_model_to_domain(model: account::Model) -> Account {
    Account {
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        display_name: model.display_name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> AccountError {
    AccountError::Store(format!("Database error: {}", e))
}

fn like(pattern: String) -> LikeExpr {
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    let msg = e.to_string();
    msg.contains("UNIQUE") || msg.contains("duplicate")
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_name(&self, username: &str) -> AccountResult<Option<Account>> {
        let model = account::Entity::find_by_id(username.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(account_model_to_domain))
    }

    async fn search(
        &self,
        username_pattern: &str,
        email_pattern: &str,
        limit: u64,
        page: u64,
    ) -> AccountResult<SearchResult> {
        let mut query = account::Entity::find();

        if let Some(pattern) = to_like_pattern(username_pattern) {
            query = query.filter(account::Column::Username.like(like(pattern)));
        }
        if let Some(pattern) = to_like_pattern(email_pattern) {
            query = query.filter(account::Column::Email.like(like(pattern)));
        }

        // Count total
        let total = query.clone().count(&self.db).await.map_err(db_err)?;

        // SQLite binds OFFSET as a signed integer; no row lives past i64::MAX
        let offset = page_offset(page, limit);
        if offset > i64::MAX as u64 {
            return Ok(SearchResult {
                accounts: Vec::new(),
                total,
            });
        }

        // Paginate
        let models = query
            .order_by_asc(account::Column::Username)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(SearchResult {
            accounts: models.into_iter().map(account_model_to_domain).collect(),
            total,
        })
    }

    async fn insert(&self, new: Account) -> AccountResult<Account> {
        let now = Utc::now();
        let username = new.username.clone();

        let model = account::ActiveModel {
            username: Set(new.username),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            display_name: Set(new.display_name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                AccountError::Conflict(username)
            } else {
                db_err(e)
            }
        })?;

        Ok(account_model_to_domain(inserted))
    }

    async fn update(&self, changed: Account) -> AccountResult<Account> {
        let existing = account::Entity::find_by_id(changed.username.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(AccountError::NotFound(changed.username));
        };

        let mut active: account::ActiveModel = existing.into();
        active.email = Set(changed.email);
        active.password_hash = Set(changed.password_hash);
        active.display_name = Set(changed.display_name);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;

        Ok(account_model_to_domain(updated))
    }

    async fn delete(&self, username: &str) -> AccountResult<()> {
        let result = account::Entity::delete_by_id(username.to_string())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(username.to_string()));
        }

        Ok(())
    }
}
