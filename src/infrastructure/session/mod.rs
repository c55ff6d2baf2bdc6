//! Session infrastructure module
//!
//! Token generation and the `Cookies` partition mapping tokens to identities.

mod generator;
mod service;

pub use generator::TokenGenerator;
pub use service::SessionService;
