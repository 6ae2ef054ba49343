// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Token check in front of protected routes.
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, transport, AppState};

/// Identity resolved from a verified token, handed to downstream handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Reject the request with 403 unless it carries a valid token
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = transport::extract_token(request.headers(), &state.settings.token);
    let claims = state.gateway.authorize(token)?;

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.username,
    });
    Ok(next.run(request).await)
}
