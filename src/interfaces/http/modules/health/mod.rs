//! Health module: liveness and store reachability

pub mod handlers;

pub use handlers::*;
