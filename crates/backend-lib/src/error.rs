// crates/backend-lib/src/error.rs

//! Central error types + Axum integration.
use authgate_common::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::{CredentialError, KeyError, TokenError};
use crate::config::ConfigError;

/// Request-time failures. Each variant maps to exactly one status code; the
/// detail string is for operators and never reaches the client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown user or wrong password.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Missing, invalid, revoked or expired token.
    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Authentication(_) => StatusCode::BAD_REQUEST,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    /// Validation and authentication failures share a code so a client cannot
    /// tell a missing field from a wrong password.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::Authentication(_) => "REQ_001",
            AppError::Authorization(_) => "AUTH_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for the client
    pub fn sanitized_message(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::Authentication(_) => "Bad request",
            AppError::Authorization(_) => "Forbidden",
            AppError::Internal(_) => "An internal server error occurred",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed with internal error");
        }

        let body = ErrorBody::new(self.error_code(), self.sanitized_message());
        (self.status_code(), axum::Json(body)).into_response()
    }
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(_) => AppError::Internal(err.to_string()),
            other => AppError::Authorization(other.to_string()),
        }
    }
}

/// Conditions that stop the process before it binds its listener.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("key material unavailable: {0}")]
    KeyMaterial(#[from] KeyError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to hash password for fixture user {username}: {reason}")]
    Hashing { username: String, reason: String },
}
