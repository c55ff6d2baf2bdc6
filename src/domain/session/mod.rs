//! Session domain
//!
//! Opaque bearer tokens and the records they map to in the `Cookies` partition.

mod entity;

pub use entity::{SessionRecord, SessionToken, TOKEN_ALPHABET, TOKEN_LENGTH};
