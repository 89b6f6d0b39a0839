// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the bank API server.

pub mod auth;

pub use auth::require_account_owner;
