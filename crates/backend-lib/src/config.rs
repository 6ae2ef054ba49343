// ============================
// authgate-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::DEFAULT_TOKEN_LIFETIME;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "authgate.toml";

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "AUTHGATE_";

/// Longest token lifetime accepted from configuration (one year)
const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("{0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Signing key locations
    pub keys: KeySettings,
    /// Token lifetime and delivery
    pub token: TokenSettings,
    /// What logout does on the server side
    pub revocation: RevocationMode,
    /// How often revoked entries past their expiry are pruned
    pub revocation_sweep_secs: u64,
    /// In-memory user directory, hashed at startup
    pub users: Vec<UserFixture>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PEM files produced by the external key-provisioning step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// Token lifetime in seconds
    pub lifetime_secs: u64,
    /// How tokens travel between client and server
    pub delivery: TokenDelivery,
    /// Cookie carrying the token in cookie mode
    pub cookie_name: String,
}

/// Token transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenDelivery {
    /// HTTP-only cookie set by the login response
    #[default]
    Cookie,
    /// Token returned in the login body and replayed as `Authorization: Bearer`
    Bearer,
}

/// Server-side effect of logout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationMode {
    /// The client is told to drop its token; nothing is remembered
    #[default]
    Advisory,
    /// Logged-out tokens are refused until they expire
    DenyList,
}

/// A user of the fixture directory
#[derive(Clone, Serialize, Deserialize)]
pub struct UserFixture {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub secret: Option<String>,
}

impl UserFixture {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            secret: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }
}

impl fmt::Debug for UserFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFixture")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3003)),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            keys: KeySettings::default(),
            token: TokenSettings::default(),
            revocation: RevocationMode::default(),
            revocation_sweep_secs: 15 * 60,
            users: vec![UserFixture::new("foouser", "111")],
        }
    }
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::from("jwt_priv.pem"),
            public_key_path: PathBuf::from("jwt_pub.pem"),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            lifetime_secs: DEFAULT_TOKEN_LIFETIME.as_secs(),
            delivery: TokenDelivery::default(),
            cookie_name: "authToken".to_string(),
        }
    }
}

impl TokenSettings {
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs)
    }
}

impl Settings {
    /// Load settings from `authgate.toml` and `AUTHGATE_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from a specific file; environment variables still win.
    /// A missing file is not an error, defaults apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log_level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log_level
            )));
        }

        if self.token.lifetime_secs == 0 || self.token.lifetime_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::Invalid(format!(
                "token.lifetime_secs must be between 1 and {MAX_TOKEN_LIFETIME_SECS}"
            )));
        }

        let cookie_name_ok = !self.token.cookie_name.is_empty()
            && self
                .token
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !cookie_name_ok {
            return Err(ConfigError::Invalid(format!(
                "token.cookie_name {:?} is not a valid cookie name",
                self.token.cookie_name
            )));
        }

        if self.revocation_sweep_secs == 0 {
            return Err(ConfigError::Invalid(
                "revocation_sweep_secs must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() || user.password.is_empty() {
                return Err(ConfigError::Invalid(
                    "fixture users need a non-empty username and password".to_string(),
                ));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate fixture user {:?}",
                    user.username
                )));
            }
        }

        Ok(())
    }
}
