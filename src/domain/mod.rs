//! Domain layer: accounts, scopes and errors.

pub mod account;
pub mod error;
pub mod scope;

pub use account::{
    Account, AccountStore, AccountView, CredentialChecker, SearchQuery, SearchRequest,
    SearchResult, MATCH_ALL,
};
pub use error::{AccountError, AccountResult};
pub use scope::Scope;
