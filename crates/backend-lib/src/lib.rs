// ============================
// authgate-backend-lib/src/lib.rs
// ============================
//! Core functionality for the `authgate` token gateway.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod transport;

#[cfg(test)]
mod testkeys;

use std::sync::Arc;

use tracing::info;

use crate::auth::{CredentialStore, KeyPair};
use crate::config::Settings;
use crate::error::StartupError;
use crate::gateway::AuthGateway;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Login, access and logout flows
    pub gateway: Arc<AuthGateway>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Validate settings, load the key pair from disk, then hash the user
    /// directory. Resolves only when the gateway is ready to serve.
    pub async fn new(settings: Settings) -> Result<Self, StartupError> {
        settings.validate()?;
        let keys = KeyPair::load(
            &settings.keys.private_key_path,
            &settings.keys.public_key_path,
        )?;
        info!(
            private_key = %settings.keys.private_key_path.display(),
            public_key = %settings.keys.public_key_path.display(),
            "loaded signing keys"
        );
        Self::with_keys(settings, keys).await
    }

    /// Same as [`AppState::new`] with an already loaded key pair
    pub async fn with_keys(mut settings: Settings, keys: KeyPair) -> Result<Self, StartupError> {
        settings.validate()?;
        // Plaintext passwords leave the settings here and are wiped once hashed
        let users = std::mem::take(&mut settings.users);
        let store = CredentialStore::bootstrap(users).await?;
        info!(users = store.len(), "user directory ready");

        let gateway = AuthGateway::new(
            store,
            keys,
            settings.token.lifetime(),
            settings.revocation,
        );

        Ok(Self {
            gateway: Arc::new(gateway),
            settings: Arc::new(settings),
        })
    }
}
