//! Domain errors

use thiserror::Error;

/// Errors produced by account operations.
///
/// Each variant maps to exactly one HTTP outcome in the interface layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Malformed or missing input
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Target account does not exist
    #[error("no user with username {0}")]
    NotFound(String),

    /// Username already taken
    #[error("user already exists: {0}")]
    Conflict(String),

    /// Old secret did not verify on self-update
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Storage/database error
    #[error("store error: {0}")]
    Store(String),
}

impl AccountError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn field_required(field: &'static str) -> Self {
        Self::validation(field, "field is required")
    }

    /// Short machine-readable reason used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Store(_) => "internal",
        }
    }
}

/// Result type for account operations
pub type AccountResult<T> = Result<T, AccountError>;
