//! User identity type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building an [`Identity`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityError {
    #[error("Identity cannot be empty")]
    Empty,
}

/// Unique user-facing key (an email-like string)
///
/// Created at signup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create a new identity, rejecting blank values
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(IdentityError::Empty);
        }

        Ok(Self(value))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
