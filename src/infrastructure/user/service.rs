//! Credential service for signup and password verification

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::storage::{KeyValueStore, Partition};
use crate::domain::{DomainError, Identity};

use super::password::PasswordHasher;

/// Registers users and verifies their passwords
///
/// Owns the `Users` partition: identity -> password hash.
#[derive(Debug, Clone)]
pub struct CredentialService {
    store: Arc<dyn KeyValueStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialService {
    /// Create a new credential service
    pub fn new(store: Arc<dyn KeyValueStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Register a new identity
    ///
    /// Returns `Ok(false)` if the identity already has a credential; the
    /// stored hash is left untouched in that case.
    pub fn register(&self, identity: &str, secret: &str) -> Result<bool, DomainError> {
        let identity = Identity::new(identity).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.store.contains(Partition::Users, identity.as_str())? {
            debug!(identity = %identity, "Signup rejected, identity exists");
            return Ok(false);
        }

        let hash = self.hasher.hash(secret)?;

        // Another signup may have won the race since the check above
        let created = self
            .store
            .put_if_absent(Partition::Users, identity.as_str(), hash.as_bytes())?;

        if created {
            info!(identity = %identity, "Registered user");
        }

        Ok(created)
    }

    /// Check a secret against the stored credential
    ///
    /// Unknown identities and store failures both read as a failed check.
    pub fn verify(&self, identity: &str, secret: &str) -> bool {
        let stored = match self.store.get(Partition::Users, identity) {
            Ok(Some(stored)) => stored,
            Ok(None) => return false,
            Err(e) => {
                error!(identity = %identity, error = %e, "Credential lookup failed");
                return false;
            }
        };

        match std::str::from_utf8(&stored) {
            Ok(hash) => self.hasher.verify(secret, hash),
            Err(_) => false,
        }
    }
}
