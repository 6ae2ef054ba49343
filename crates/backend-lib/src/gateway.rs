// ============================
// crates/backend-lib/src/gateway.rs
// ============================
//! Login, resource access and logout flows.
//!
//! The gateway is the only place that combines the credential store with the
//! token issuer and verifier. Handlers stay thin: they pull inputs out of the
//! request, call into here, and turn the outcome into a response.
use std::sync::Arc;
use std::time::Duration;

use authgate_common::LoginRequest;
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::auth::{
    Claims, CredentialStore, DenyList, IssuedToken, KeyPair, MatchResult, TokenError, TokenIssuer,
    TokenVerifier,
};
use crate::config::RevocationMode;
use crate::error::AppError;
use crate::metrics::{
    ACCESS_DENIED, ACCESS_GRANTED, LOGIN_REJECTED, LOGIN_SUCCESS, LOGOUT, REVOCATION_RECORDED,
    TOKEN_ISSUED,
};

/// A successful login
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub username: String,
    pub token: IssuedToken,
}

/// What logout produced
#[derive(Debug, Clone, Default)]
pub struct LogoutOutcome {
    /// Already-expired token to overwrite the client's copy with. `None` when
    /// the presented token did not verify, so there is no subject to sign for.
    pub replacement: Option<IssuedToken>,
    /// Whether the presented token went onto the deny-list
    pub revoked: bool,
}

pub struct AuthGateway {
    store: Arc<CredentialStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    deny_list: Option<DenyList>,
}

impl AuthGateway {
    pub fn new(
        store: CredentialStore,
        keys: KeyPair,
        token_lifetime: Duration,
        revocation: RevocationMode,
    ) -> Self {
        let keys = Arc::new(keys);
        let deny_list = match revocation {
            RevocationMode::Advisory => None,
            RevocationMode::DenyList => Some(DenyList::new()),
        };

        Self {
            store: Arc::new(store),
            issuer: TokenIssuer::new(keys.clone(), token_lifetime),
            verifier: TokenVerifier::new(keys),
            deny_list,
        }
    }

    /// Verify credentials and mint a token.
    ///
    /// Unknown user and wrong password produce the same client-visible error;
    /// only the log line tells them apart.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, AppError> {
        let Some((username, password)) = request.credentials() else {
            warn!("login request without username and password");
            counter!(LOGIN_REJECTED).increment(1);
            return Err(AppError::Validation(
                "username and password are required".to_string(),
            ));
        };

        let store = self.store.clone();
        let candidate_user = username.to_string();
        let candidate = Zeroizing::new(password.to_string());
        let outcome = tokio::task::spawn_blocking(move || store.verify(&candidate_user, &candidate))
            .await
            .map_err(|e| AppError::Internal(format!("password verification task failed: {e}")))??;

        match outcome {
            MatchResult::Valid => {}
            MatchResult::NotFound => {
                warn!(%username, "login for username not in user directory");
                counter!(LOGIN_REJECTED).increment(1);
                return Err(AppError::Authentication("unknown username".to_string()));
            }
            MatchResult::Invalid => {
                warn!(%username, "bad password");
                counter!(LOGIN_REJECTED).increment(1);
                return Err(AppError::Authentication("wrong password".to_string()));
            }
        }

        let token = self.issuer.issue(username)?;
        info!(%username, expires_at = %token.expires_at, "login succeeded, token issued");
        counter!(LOGIN_SUCCESS).increment(1);
        counter!(TOKEN_ISSUED).increment(1);

        Ok(LoginGrant {
            username: username.to_string(),
            token,
        })
    }

    pub fn authorize(&self, token: Option<&str>) -> Result<Claims, AppError> {
        self.authorize_at(token, Utc::now())
    }

    /// Gate a protected resource. Every failure is the same `Authorization`
    /// error; the specific reason is only logged.
    pub fn authorize_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Claims, AppError> {
        let Some(token) = token else {
            debug!("access denied: no token presented");
            counter!(ACCESS_DENIED).increment(1);
            return Err(AppError::Authorization("no token presented".to_string()));
        };

        match self.check(token, now) {
            Ok(claims) => {
                debug!(username = %claims.username, "verified token");
                counter!(ACCESS_GRANTED).increment(1);
                Ok(claims)
            }
            Err(reason) => {
                info!(%reason, "access denied");
                counter!(ACCESS_DENIED).increment(1);
                Err(reason.into())
            }
        }
    }

    fn check(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = self.verifier.verify_at(token, now)?;
        if self
            .deny_list
            .as_ref()
            .is_some_and(|list| list.is_revoked(&claims.jti))
        {
            return Err(TokenError::Revoked);
        }
        Ok(claims)
    }

    pub fn logout(&self, token: Option<&str>) -> Result<LogoutOutcome, AppError> {
        self.logout_at(token, Utc::now())
    }

    /// Requires a token to be presented. The token does not have to be valid:
    /// logging out with a dead token still succeeds, there is just nothing to
    /// revoke or re-sign.
    pub fn logout_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LogoutOutcome, AppError> {
        let Some(token) = token else {
            warn!("logout request without a token");
            return Err(AppError::Validation("logout requires a token".to_string()));
        };

        let Ok(claims) = self.check(token, now) else {
            debug!("logout with a token that no longer verifies");
            counter!(LOGOUT).increment(1);
            return Ok(LogoutOutcome::default());
        };

        let mut revoked = false;
        if let Some(list) = &self.deny_list {
            list.revoke(&claims.jti, claims.exp);
            counter!(REVOCATION_RECORDED).increment(1);
            revoked = true;
        }

        let replacement = self.issuer.issue_expired(&claims.username, now)?;
        info!(username = %claims.username, revoked, "logged out");
        counter!(LOGOUT).increment(1);

        Ok(LogoutOutcome {
            replacement: Some(replacement),
            revoked,
        })
    }

    /// Secret of an already-authorized user
    pub fn lookup_secret(&self, username: &str) -> Option<String> {
        self.store.lookup_secret(username).map(str::to_string)
    }

    pub fn deny_list(&self) -> Option<&DenyList> {
        self.deny_list.as_ref()
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}
