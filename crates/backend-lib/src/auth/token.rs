// ============================
// authgate-backend-lib/src/auth/token.rs
// ============================
//! Shared token definitions: algorithm, lifetime, failure kinds.
use std::collections::HashSet;
use std::time::Duration;

use jsonwebtoken::{Algorithm, Validation};
use thiserror::Error;

/// The only algorithm tokens are signed or accepted with
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::RS256;

/// Default token lifetime (6 hours)
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(6 * 60 * 60);

/// Token failures. Kept distinct for logs, collapsed to one outcome for clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature rejected")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token revoked")]
    Revoked,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Signature and structure checks only. Expiry is compared against an
/// explicit clock by the verifier, so the library's own `exp` check is off.
pub(crate) fn token_validation() -> Validation {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.required_spec_claims = HashSet::from(["exp".to_string()]);
    validation
}
