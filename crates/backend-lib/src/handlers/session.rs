// ============================
// crates/backend-lib/src/handlers/session.rs
// ============================
//! `POST /login` and `POST /logout`.
use std::sync::Arc;

use authgate_common::{LoginRequest, LoginResponse};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::warn;

use crate::config::TokenDelivery;
use crate::error::AppError;
use crate::{transport, AppState};

/// Verify credentials and hand out a token, as a cookie or in the body
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "unreadable login body");
        AppError::Validation(rejection.body_text())
    })?;

    let grant = state.gateway.login(&request).await?;
    let token_settings = &state.settings.token;

    let response = match token_settings.delivery {
        TokenDelivery::Cookie => {
            let cookie = transport::token_cookie(
                &token_settings.cookie_name,
                &grant.token.token,
                grant.token.expires_at,
            )?;
            let body = LoginResponse {
                username: grant.username,
                token: None,
            };
            ([(SET_COOKIE, cookie)], Json(body)).into_response()
        }
        TokenDelivery::Bearer => Json(LoginResponse {
            username: grant.username,
            token: Some(grant.token.token),
        })
        .into_response(),
    };
    Ok(response)
}

/// Overwrite the client's token with an expired one. 400 without a token.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token_settings = &state.settings.token;
    let token = transport::extract_token(&headers, token_settings);
    let outcome = state.gateway.logout(token)?;

    if token_settings.delivery == TokenDelivery::Bearer {
        return Ok(StatusCode::OK.into_response());
    }

    let (value, expires_at) = match outcome.replacement {
        Some(replacement) => (replacement.token, replacement.expires_at),
        None => (String::new(), Utc::now() - chrono::Duration::hours(1)),
    };
    let cookie = transport::token_cookie(&token_settings.cookie_name, &value, expires_at)?;
    Ok((StatusCode::OK, [(SET_COOKIE, cookie)]).into_response())
}
