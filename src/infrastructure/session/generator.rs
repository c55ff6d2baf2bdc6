//! Session token generation
//!
//! Tokens are drawn from the OS CSPRNG, one uniform pick per character.

use rand::rngs::OsRng;
use rand::Rng;

use crate::domain::session::{SessionToken, TOKEN_ALPHABET, TOKEN_LENGTH};

/// Generator for opaque session tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new token of [`TOKEN_LENGTH`] letters
    pub fn generate(&self) -> SessionToken {
        let mut rng = OsRng;

        let token: String = (0..TOKEN_LENGTH)
            .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
            .collect();

        SessionToken::new(token)
    }
}
