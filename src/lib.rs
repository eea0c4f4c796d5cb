//! # Account Panel
//!
//! User account management for the panel: self-service profile and
//! password changes, plus scope-gated administrative create, search,
//! update and delete.
//!
//! ## Architecture
//!
//! - **domain**: accounts, views, search queries, scopes, errors and ports
//! - **application**: `AccountService` use-cases
//! - **infrastructure**: sea-orm store, in-memory store, bcrypt, JWT
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: paging, wildcard patterns, shutdown signalling

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryAccountStore};

pub use interfaces::http::create_api_router;
