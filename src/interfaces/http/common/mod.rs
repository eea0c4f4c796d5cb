//! Response envelopes and extractors shared by all HTTP handlers

mod json_body;

pub use json_body::{JsonBody, JsonBodyRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::AccountError;

/// Standard success envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub error: String,
    /// Machine-readable reason
    pub code: String,
    /// Offending input field, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.into(),
            field: None,
        }
    }
}

/// Error half of every handler's return type
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map an [`AccountError`] to exactly one status and body.
///
/// Store failures are logged here and reported without detail.
pub fn api_error(e: AccountError) -> ApiError {
    let code = e.code();
    let (status, body) = match e {
        AccountError::Validation { field, reason } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                field: Some(field.to_string()),
                ..ErrorResponse::new(code, reason)
            },
        ),
        AccountError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(code, "no user with username"),
        ),
        AccountError::Conflict(_) => (
            StatusCode::CONFLICT,
            ErrorResponse::new(code, "user already exists"),
        ),
        AccountError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            ErrorResponse::new(code, "invalid credentials"),
        ),
        AccountError::Store(detail) => {
            error!("Account store failure: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(code, "internal server error"),
            )
        }
    };
    (status, Json(body))
}

/// Pagination metadata for search responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u64,
    pub page_size: u64,
    pub max_page_size: u64,
    /// Matching accounts across all pages
    pub total: u64,
}

/// Success envelope with pagination metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PagedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub paging: PageInfo,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, paging: PageInfo) -> Self {
        Self {
            success: true,
            data,
            paging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_with_field() {
        let (status, Json(body)) =
            api_error(AccountError::validation("limit", "page size must be a positive number"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "page size must be a positive number");
        assert_eq!(body.code, "validation");
        assert_eq!(body.field.as_deref(), Some("limit"));
    }

    #[test]
    fn each_error_has_its_status() {
        let cases = [
            (AccountError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AccountError::Conflict("x".into()), StatusCode::CONFLICT),
            (AccountError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                AccountError::Store("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(api_error(err).0, expected);
        }
    }

    #[test]
    fn store_detail_is_not_leaked() {
        let (_, Json(body)) = api_error(AccountError::Store("password=hunter2".into()));
        assert!(!body.error.contains("hunter2"));
        assert_eq!(body.code, "internal");
    }
}
