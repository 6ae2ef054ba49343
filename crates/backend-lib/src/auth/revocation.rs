// ============================
// crates/backend-lib/src/auth/revocation.rs
// ============================
//! Server-side record of logged-out tokens.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use metrics::gauge;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::metrics::REVOCATION_ACTIVE;

/// Tokens refused until their own expiry, keyed by token id (`jti`).
///
/// Entries only need to outlive the token they block: once `exp` has passed
/// the verifier rejects the token anyway, so the sweep drops it.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    /// token id -> token `exp` (epoch milliseconds)
    entries: Arc<DashMap<String, i64>>,
}

impl DenyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the token with id `jti` until `exp` (epoch milliseconds)
    pub fn revoke(&self, jti: &str, exp: i64) {
        self.entries.insert(jti.to_string(), exp);
        gauge!(REVOCATION_ACTIVE).set(self.entries.len() as f64);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries whose token has expired, returning how many went
    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let now = now.timestamp_millis();
        let before = self.entries.len();
        self.entries.retain(|_, exp| now < *exp);
        let removed = before.saturating_sub(self.entries.len());

        if removed > 0 {
            gauge!(REVOCATION_ACTIVE).set(self.entries.len() as f64);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `sweep_at` on a fixed interval for as long as the runtime lives
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let list = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = list.sweep_at(Utc::now());
                if removed > 0 {
                    debug!(removed, remaining = list.len(), "swept expired revocations");
                }
            }
        })
    }
}
