// ============================
// authgate-backend-lib/src/auth/credentials.rs
// ============================
//! In-memory user directory with password verification.
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::info;

use super::password::{hash_password_secure, verify_password};
use crate::config::UserFixture;
use crate::error::StartupError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The hasher failed for a reason other than a mismatch.
    #[error("password hash verification failed: {0}")]
    Hash(String),
}

/// Outcome of checking a username/password pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Valid,
    Invalid,
    NotFound,
}

/// A user of the directory. Only the hash of the password is kept.
#[derive(Clone)]
pub struct UserRecord {
    username: String,
    password_hash: String,
    secret: Option<String>,
}

impl UserRecord {
    /// Hash the fixture password and drop the plaintext.
    pub fn from_fixture(fixture: UserFixture) -> Result<Self, CredentialError> {
        let UserFixture {
            username,
            mut password,
            secret,
        } = fixture;
        let password_hash = hash_password_secure(&mut password)?;

        Ok(Self {
            username,
            password_hash,
            secret,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password_hash", &self.password_hash)
            .finish_non_exhaustive()
    }
}

/// Username to user record mapping, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, UserRecord>,
}

impl CredentialStore {
    /// Hash every fixture on the blocking pool and resolve once all of them
    /// are done. No store exists, and therefore nothing can log in, before
    /// this returns.
    pub async fn bootstrap(fixtures: Vec<UserFixture>) -> Result<Self, StartupError> {
        let pending: Vec<_> = fixtures
            .into_iter()
            .map(|fixture| {
                let username = fixture.username.clone();
                let task = tokio::task::spawn_blocking(move || UserRecord::from_fixture(fixture));
                (username, task)
            })
            .collect();

        let mut records = Vec::with_capacity(pending.len());
        for (username, task) in pending {
            let record = task
                .await
                .map_err(|e| StartupError::Hashing {
                    username: username.clone(),
                    reason: e.to_string(),
                })?
                .map_err(|e| StartupError::Hashing {
                    username: username.clone(),
                    reason: e.to_string(),
                })?;
            info!(username = %record.username(), "password hash ready");
            records.push(record);
        }

        Ok(Self::from_records(records))
    }

    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();
        Self { users }
    }

    /// Check a candidate password for `username`.
    ///
    /// An unknown username returns `NotFound` straight away, without running
    /// the hasher. The store does not hide that timing difference; callers
    /// must collapse `NotFound` and `Invalid` into one client-visible outcome.
    pub fn verify(&self, username: &str, candidate: &str) -> Result<MatchResult, CredentialError> {
        let Some(record) = self.users.get(username) else {
            return Ok(MatchResult::NotFound);
        };

        if verify_password(&record.password_hash, candidate)? {
            Ok(MatchResult::Valid)
        } else {
            Ok(MatchResult::Invalid)
        }
    }

    /// Protected payload for a known user. No password check happens here;
    /// the caller must already hold a verified token for `username`.
    pub fn lookup_secret(&self, username: &str) -> Option<&str> {
        self.users.get(username).and_then(UserRecord::secret)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
