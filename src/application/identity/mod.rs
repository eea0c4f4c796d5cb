//! Identity module: account management
//!
//! Contains the `AccountService` which orchestrates all account
//! use-cases: search, lookup, creation, self and administrative updates,
//! deletion.

pub mod service;

pub use service::AccountService;
