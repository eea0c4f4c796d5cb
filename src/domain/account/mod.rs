//! Account aggregate
//!
//! Contains the Account entity, its transfer view, search query types and
//! the ports (store, credential checker) the service depends on.

pub mod credentials;
pub mod model;
pub mod repository;
pub mod search;
pub mod view;

pub use credentials::CredentialChecker;
pub use model::Account;
pub use repository::AccountStore;
pub use search::{SearchQuery, SearchRequest, SearchResult, MATCH_ALL};
pub use view::AccountView;
