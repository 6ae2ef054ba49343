// ============================
// authgate-backend-lib/src/auth/issuer.rs
// ============================
//! Token minting.
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Header};

use super::claims::Claims;
use super::keys::KeyPair;
use super::token::{TokenError, TOKEN_ALGORITHM};

/// How far in the past the replacement token handed out at logout expires
const LOGOUT_BACKDATE_SECS: i64 = 60 * 60;

/// A freshly signed token and the instant it stops being valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs tokens with the private half of the key pair.
///
/// Callers must only ask for a token once the username's password has been
/// verified; the issuer itself does not look at the credential store.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyPair>,
    lifetime: Duration,
}

impl TokenIssuer {
    /// A lifetime too long to represent as a timestamp makes every `issue`
    /// fail with `TokenError::Signing` instead of panicking.
    pub fn new(keys: Arc<KeyPair>, lifetime: Duration) -> Self {
        Self { keys, lifetime }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(username, Utc::now())
    }

    /// Sign `{username, exp = now + lifetime}` with millisecond precision.
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = chrono::Duration::from_std(self.lifetime)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                TokenError::Signing(format!("lifetime {:?} out of range", self.lifetime))
            })?;
        self.sign(Claims::new(username, expires_at))
    }

    /// Sign a token that is already expired. Logout hands it to the client to
    /// overwrite the token it holds.
    pub fn issue_expired(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_sub_signed(chrono::Duration::seconds(LOGOUT_BACKDATE_SECS))
            .ok_or_else(|| TokenError::Signing("logout expiry out of range".to_string()))?;
        self.sign(Claims::new(username, expires_at))
    }

    fn sign(&self, claims: Claims) -> Result<IssuedToken, TokenError> {
        let expires_at = claims.expires_at().ok_or_else(|| {
            TokenError::Signing(format!("expiry {}ms out of range", claims.exp))
        })?;
        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, self.keys.encoding_key())
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}
