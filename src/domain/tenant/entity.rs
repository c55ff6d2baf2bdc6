//! Blog name and tenant blog types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted blog name after sanitizing
pub const MIN_BLOG_NAME_LENGTH: usize = 2;

/// Errors raised while sanitizing a blog name
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BlogNameError {
    #[error("Blog name '{0}' must contain at least {MIN_BLOG_NAME_LENGTH} letters")]
    TooShort(String),
}

/// Sanitized blog name: ASCII letters only, case-sensitive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlogName(String);

impl BlogName {
    /// Strip every character outside `A-Za-z` and validate the result
    pub fn sanitize(raw: &str) -> Result<Self, BlogNameError> {
        let name: String = raw.chars().filter(char::is_ascii_alphabetic).collect();

        if name.len() < MIN_BLOG_NAME_LENGTH {
            return Err(BlogNameError::TooShort(raw.to_string()));
        }

        Ok(Self(name))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// External address for this name under `hosting_domain`
    pub fn address(&self, hosting_domain: &str) -> String {
        format!("{}.{}", self.0, hosting_domain)
    }
}

impl TryFrom<String> for BlogName {
    type Error = BlogNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::sanitize(&value)
    }
}

impl From<BlogName> for String {
    fn from(name: BlogName) -> Self {
        name.0
    }
}

impl std::fmt::Display for BlogName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hosted blog: its name and externally visible address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantBlog {
    #[serde(rename = "blogname")]
    pub name: String,
    #[serde(rename = "website")]
    pub address: String,
}

impl TenantBlog {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}
