// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the gateway's protected routes.

pub mod auth;

pub use auth::{require_token, AuthenticatedUser};
