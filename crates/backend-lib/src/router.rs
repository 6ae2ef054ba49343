// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table.
use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::require_token;
use crate::AppState;

/// Create the gateway router
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/secret", get(handlers::secret))
        .route_layer(from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
