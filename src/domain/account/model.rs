use chrono::{DateTime, Utc};

use super::AccountView;

/// Persisted account.
///
/// `username` is the sole identifier and never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Fresh account, timestamps set to now. Stores may overwrite them.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: String::new(),
            display_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy a view onto this account.
    ///
    /// - `username`: never copied
    /// - `email`: copied when present and non-empty
    /// - `display_name`: copied when present; an empty value clears it
    /// - `password_hash`: replaced only when `new_password_hash` is given
    pub fn merge_view(mut self, view: &AccountView, new_password_hash: Option<String>) -> Self {
        if let Some(email) = view.email.as_deref().filter(|e| !e.is_empty()) {
            self.email = email.to_string();
        }
        if let Some(display_name) = view.display_name.as_deref() {
            self.display_name = if display_name.is_empty() {
                None
            } else {
                Some(display_name.to_string())
            };
        }
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
        self
    }
}
