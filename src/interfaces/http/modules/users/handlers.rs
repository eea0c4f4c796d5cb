//! Account management API handlers
//!
//! Self-service routes take the acting identity from the access token;
//! administrative routes take it from the path. Business rules live in
//! `AccountService`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::dto::{AccountDto, AccountViewRequest, SearchAccountsRequest};
use crate::application::AccountService;
use crate::interfaces::http::common::{
    api_error, ApiError, ApiResponse, ErrorResponse, JsonBody, PageInfo, PagedResponse,
};
use crate::interfaces::http::middleware::AuthenticatedAccount;
use crate::shared::PageLimits;

/// Allowed methods on the collection root
pub const COLLECTION_METHODS: &str = "GET,PUT,POST,OPTIONS";
/// Allowed methods on a named account
pub const ACCOUNT_METHODS: &str = "PUT,GET,POST,DELETE,OPTIONS";

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub accounts: Arc<AccountService>,
    pub limits: PageLimits,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = ["login"])),
    responses(
        (status = 200, description = "Caller's own account", body = ApiResponse<AccountDto>),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
pub async fn get_self(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedAccount>,
) -> ApiResult<AccountDto> {
    let account = state
        .accounts
        .require(&caller.username)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(account.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = ["login"])),
    request_body = AccountViewRequest,
    responses(
        (status = 200, description = "Updated own account", body = ApiResponse<AccountDto>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Current password did not verify", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
pub async fn update_self(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedAccount>,
    JsonBody(request): JsonBody<AccountViewRequest>,
) -> ApiResult<AccountDto> {
    let account = state
        .accounts
        .update_self(&caller.username, request.into())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(account.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = ["view-accounts"])),
    request_body = SearchAccountsRequest,
    responses(
        (status = 200, description = "One page of matching accounts", body = PagedResponse<AccountDto>),
        (status = 400, description = "Invalid page size or page", body = ErrorResponse)
    )
)]
pub async fn search_accounts(
    State(state): State<UserHandlerState>,
    JsonBody(request): JsonBody<SearchAccountsRequest>,
) -> Result<Json<PagedResponse<AccountDto>>, ApiError> {
    let (query, result) = state
        .accounts
        .search_accounts(request.into(), &state.limits)
        .await
        .map_err(api_error)?;

    let items = result.accounts.into_iter().map(AccountDto::from).collect();
    let paging = PageInfo {
        page: query.page,
        page_size: query.page_size,
        max_page_size: state.limits.max_page_size,
        total: result.total,
    };
    Ok(Json(PagedResponse::new(items, paging)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{username}",
    tag = "Users",
    security(("bearer_auth" = ["edit-accounts"])),
    params(("username" = String, Path, description = "Username of the new account")),
    request_body = AccountViewRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AccountDto>),
        (status = 400, description = "Validation error or missing password", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<UserHandlerState>,
    Path(username): Path<String>,
    JsonBody(request): JsonBody<AccountViewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountDto>>), ApiError> {
    let account = state
        .accounts
        .create_account(&username, request.into())
        .await
        .map_err(api_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(account.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "Users",
    security(("bearer_auth" = ["view-accounts"])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Account details", body = ApiResponse<AccountDto>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<UserHandlerState>,
    Path(username): Path<String>,
) -> ApiResult<AccountDto> {
    let account = state.accounts.require(&username).await.map_err(api_error)?;
    Ok(Json(ApiResponse::success(account.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{username}",
    tag = "Users",
    security(("bearer_auth" = ["edit-accounts"])),
    params(("username" = String, Path, description = "Username")),
    request_body = AccountViewRequest,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<AccountDto>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_account(
    State(state): State<UserHandlerState>,
    Path(username): Path<String>,
    JsonBody(request): JsonBody<AccountViewRequest>,
) -> ApiResult<AccountDto> {
    let account = state
        .accounts
        .update_account(&username, request.into())
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(account.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{username}",
    tag = "Users",
    security(("bearer_auth" = ["edit-accounts"])),
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "Deleted account snapshot", body = ApiResponse<AccountDto>),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<UserHandlerState>,
    Path(username): Path<String>,
) -> ApiResult<AccountDto> {
    let account = state
        .accounts
        .delete_account(&username)
        .await
        .map_err(api_error)?;
    Ok(Json(ApiResponse::success(account.into())))
}

#[utoipa::path(
    options,
    path = "/api/v1/users",
    tag = "Users",
    responses((status = 204, description = "Allowed methods in the Allow header"))
)]
pub async fn collection_options() -> Response {
    allowed_methods(COLLECTION_METHODS)
}

#[utoipa::path(
    options,
    path = "/api/v1/users/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses((status = 204, description = "Allowed methods in the Allow header"))
)]
pub async fn account_options() -> Response {
    allowed_methods(ACCOUNT_METHODS)
}

fn allowed_methods(methods: &'static str) -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ALLOW, methods),
            (header::ACCESS_CONTROL_ALLOW_METHODS, methods),
        ],
    )
        .into_response()
}
