//! User infrastructure module
//!
//! Credential storage backed by the `Users` partition, with Argon2
//! password hashing.

mod password;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use service::CredentialService;
