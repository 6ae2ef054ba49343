// ============================
// crates/backend-lib/src/handlers/secret.rs
// ============================
//! `GET /secret`, the protected resource.
use std::sync::Arc;

use authgate_common::SecretResponse;
use axum::{extract::State, Extension, Json};
use tracing::info;

use crate::middleware::AuthenticatedUser;
use crate::AppState;

/// Only reachable behind [`crate::middleware::require_token`]
pub async fn secret(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<SecretResponse> {
    info!(username = %user.username, "secret requested");
    let secret = state.gateway.lookup_secret(&user.username);

    Json(SecretResponse {
        username: user.username,
        secret,
    })
}
