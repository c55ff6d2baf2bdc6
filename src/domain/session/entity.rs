//! Session token and record types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::Identity;

/// Number of characters in a session token
pub const TOKEN_LENGTH: usize = 20;

/// Symbols a session token is drawn from
pub const TOKEN_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Opaque session token handed to the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token has the shape of a generated token
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == TOKEN_LENGTH && self.0.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-side record stored under a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub identity: Identity,
    /// Absent for records written as a bare identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a record issued now
    pub fn issue(identity: Identity) -> Self {
        Self {
            identity,
            issued_at: Some(Utc::now()),
        }
    }

    /// Decode a stored record
    ///
    /// Accepts the JSON form as well as a bare identity string.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if let Ok(record) = serde_json::from_slice::<SessionRecord>(bytes) {
            return Some(record);
        }

        let raw = std::str::from_utf8(bytes).ok()?;
        let identity = Identity::new(raw).ok()?;

        Some(Self {
            identity,
            issued_at: None,
        })
    }

    /// Whether the record is older than `ttl` at `now`
    ///
    /// Records without an issue time never expire.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match self.issued_at {
            Some(issued_at) => now - issued_at >= ttl,
            None => false,
        }
    }
}
