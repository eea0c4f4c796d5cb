//! Users module: self-service and administrative account management

pub mod dto;
pub mod handlers;


pub use dto::*;
pub use handlers::*;
