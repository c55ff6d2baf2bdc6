//! Blog creation errors

use thiserror::Error;

use crate::domain::DomainError;

/// Errors returned by the provisioning workflow
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid blog name: {message}")]
    InvalidName { message: String },

    #[error("Blog name '{name}' is already taken")]
    NameTaken { name: String },

    #[error("Provisioning failed for '{name}': {message}")]
    ProvisioningFailed { name: String, message: String },

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl ProvisionError {
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
        }
    }

    pub fn name_taken(name: impl Into<String>) -> Self {
        Self::NameTaken { name: name.into() }
    }

    pub fn provisioning_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProvisioningFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}
