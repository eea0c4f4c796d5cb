//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, options, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::AccountService;
use crate::domain::Scope;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, ErrorResponse, PageInfo, PagedResponse};
use crate::interfaces::http::middleware::{auth_middleware, require_scope, AuthState};
use crate::interfaces::http::modules::{health, request_id, users};
use crate::shared::PageLimits;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token carrying the caller's scopes"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::get_self,
        users::update_self,
        users::search_accounts,
        users::create_account,
        users::get_account,
        users::update_account,
        users::delete_account,
        users::collection_options,
        users::account_options,
    ),
    components(
        schemas(
            ApiResponse<users::AccountDto>,
            PagedResponse<users::AccountDto>,
            PageInfo,
            ErrorResponse,
            users::AccountDto,
            users::AccountViewRequest,
            users::SearchAccountsRequest,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "Self-service and administrative account management"),
    ),
    info(
        title = "Account Panel API",
        version = "1.0.0",
        description = "REST API for managing panel user accounts",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Routes mounted under `/api/v1/users`.
///
/// Each method is gated on exactly one scope; `OPTIONS` needs none.
pub fn user_routes(state: users::UserHandlerState, auth_state: AuthState) -> Router {
    let login_routes = Router::new()
        .route("/", get(users::get_self).put(users::update_self))
        .route_layer(middleware::from_fn_with_state(Scope::Login, require_scope));

    let view_routes = Router::new()
        .route("/", post(users::search_accounts))
        .route("/{username}", get(users::get_account))
        .route_layer(middleware::from_fn_with_state(
            Scope::ViewAccounts,
            require_scope,
        ));

    let edit_routes = Router::new()
        .route(
            "/{username}",
            put(users::create_account)
                .post(users::update_account)
                .delete(users::delete_account),
        )
        .route_layer(middleware::from_fn_with_state(
            Scope::EditAccounts,
            require_scope,
        ));

    let options_routes = Router::new()
        .route("/", options(users::collection_options))
        .route("/{username}", options(users::account_options));

    Router::new()
        .merge(login_routes)
        .merge(view_routes)
        .merge(edit_routes)
        .merge(options_routes)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(state)
}

/// Create the API router with all routes
pub fn create_api_router(
    accounts: Arc<AccountService>,
    jwt_config: JwtConfig,
    limits: PageLimits,
) -> Router {
    let auth_state = AuthState { jwt_config };

    let user_state = users::UserHandlerState {
        accounts: accounts.clone(),
        limits,
    };

    let health_state = health::HealthState {
        accounts,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .nest("/api/v1/users", user_routes(user_state, auth_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::tests::test_config;
    use crate::infrastructure::crypto::password::BcryptCredentials;
    use crate::infrastructure::InMemoryAccountStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let accounts = Arc::new(AccountService::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(BcryptCredentials::new(4)),
        ));
        create_api_router(accounts, test_config(), PageLimits::default())
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let response = router()
            .oneshot(
                Request::get("/health")
                    .header(request_id::REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[request_id::REQUEST_ID_HEADER],
            "abc-123"
        );
    }

    #[test]
    fn openapi_lists_user_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/users"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{username}"));
    }
}
