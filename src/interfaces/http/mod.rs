//! HTTP REST API interfaces
//!
//! - `middleware`: bearer-token authentication and scope guards
//! - `modules`: request handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
