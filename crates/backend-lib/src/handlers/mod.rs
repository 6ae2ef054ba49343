// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers. Each one is a thin adapter over [`crate::gateway::AuthGateway`].

pub mod session;
pub mod secret;

pub use secret::secret;
pub use session::{login, logout};

/// Liveness probe
pub async fn health() -> &'static str {
    "Healthy"
}
