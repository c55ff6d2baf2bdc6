//! User domain
//!
//! Identities and credential records owned by the `Users` partition.

mod entity;

pub use entity::{Identity, IdentityError};
