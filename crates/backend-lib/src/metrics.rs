// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_REJECTED: &str = "login.rejected";
pub const TOKEN_ISSUED: &str = "token.issued";
pub const ACCESS_GRANTED: &str = "access.granted";
pub const ACCESS_DENIED: &str = "access.denied";
pub const LOGOUT: &str = "logout";
pub const REVOCATION_RECORDED: &str = "revocation.recorded";
pub const REVOCATION_ACTIVE: &str = "revocation.active";
