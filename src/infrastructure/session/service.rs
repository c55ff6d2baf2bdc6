//! Session service for issuing, resolving and revoking tokens

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::domain::session::{SessionRecord, SessionToken};
use crate::domain::storage::{KeyValueStore, Partition};
use crate::domain::{DomainError, Identity};

use super::generator::TokenGenerator;

/// Issues and resolves session tokens
///
/// Owns the `Cookies` partition: token -> session record. A configured TTL
/// makes older records resolve to nothing; `sweep_expired` deletes them.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
    generator: TokenGenerator,
    ttl: Option<chrono::Duration>,
}

impl SessionService {
    /// Create a session service whose sessions never expire server-side
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            generator: TokenGenerator::new(),
            ttl: None,
        }
    }

    /// Expire sessions older than `ttl`
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = chrono::Duration::from_std(ttl).ok();
        self
    }

    /// Issue a fresh token for `identity`
    pub fn issue(&self, identity: &Identity) -> Result<SessionToken, DomainError> {
        let token = self.generator.generate();
        let record = serde_json::to_vec(&SessionRecord::issue(identity.clone()))
            .map_err(|e| DomainError::internal(format!("Failed to encode session: {}", e)))?;

        self.store.put(Partition::Cookies, token.as_str(), &record)?;
        debug!(identity = %identity, "Issued session");

        Ok(token)
    }

    /// Look up the identity behind a token
    pub fn resolve(&self, token: &str) -> Option<Identity> {
        self.resolve_at(token, Utc::now())
    }

    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
        if token.is_empty() {
            return None;
        }

        let bytes = match self.store.get(Partition::Cookies, token) {
            Ok(bytes) => bytes?,
            Err(e) => {
                error!(error = %e, "Session lookup failed");
                return None;
            }
        };

        let Some(record) = SessionRecord::decode(&bytes) else {
            warn!("Ignoring malformed session record");
            return None;
        };

        if let Some(ttl) = self.ttl {
            if record.is_expired(ttl, now) {
                return None;
            }
        }

        Some(record.identity)
    }

    /// Delete a token; unknown tokens are not an error
    pub fn revoke(&self, token: &str) -> Result<(), DomainError> {
        if self.store.delete(Partition::Cookies, token)? {
            debug!("Revoked session");
        }
        Ok(())
    }

    /// Delete every record that has outlived the TTL, returns how many
    ///
    /// Does nothing when no TTL is configured.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let Some(ttl) = self.ttl else {
            return Ok(0);
        };

        let mut removed = 0;

        for token in self.store.keys(Partition::Cookies)? {
            let expired = match self.store.get(Partition::Cookies, &token)? {
                Some(bytes) => SessionRecord::decode(&bytes)
                    .map(|record| record.is_expired(ttl, now))
                    .unwrap_or(true),
                None => false,
            };

            if expired && self.store.delete(Partition::Cookies, &token)? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed, "Swept expired sessions");
        }

        Ok(removed)
    }
}
