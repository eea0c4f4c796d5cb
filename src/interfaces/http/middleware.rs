//! Authentication and scope middleware for Axum
//!
//! `auth_middleware` turns a bearer token into an [`AuthenticatedAccount`]
//! stored in request extensions; `require_scope` then gates each route on
//! one capability.

use std::collections::HashSet;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::common::ErrorResponse;
use crate::domain::Scope;
use crate::infrastructure::crypto::jwt::{verify_token, AccessClaims, JwtConfig};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    InsufficientScope(Scope),
}

/// Authentication state containing the JWT config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Identity resolved from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub username: String,
    pub scopes: HashSet<Scope>,
}

impl AuthenticatedAccount {
    pub fn from_claims(claims: AccessClaims) -> Self {
        let scopes = claims.granted_scopes();
        Self {
            username: claims.sub,
            scopes,
        }
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// JWT bearer authentication middleware.
///
/// `OPTIONS` requests pass through unauthenticated.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            let account = AuthenticatedAccount::from_claims(claims);
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        Err(e) => {
            debug!("Rejected access token: {}", e);
            auth_error_response(AuthError::InvalidToken)
        }
    }
}

/// Scope guard - must be used after `auth_middleware`
pub async fn require_scope(
    State(scope): State<Scope>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match request.extensions().get::<AuthenticatedAccount>() {
        Some(account) if account.has_scope(scope) => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientScope(scope)),
        None => auth_error_response(AuthError::MissingToken),
    }
}

/// Create an authentication error response
fn auth_error_response(error: AuthError) -> Response {
    let (status, code, message) = match error {
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Missing authentication token".to_string(),
        ),
        AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "Invalid authentication token".to_string(),
        ),
        AuthError::InsufficientScope(scope) => (
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("Missing required scope: {}", scope),
        ),
    };

    (status, Json(ErrorResponse::new(code, message))).into_response()
}
