//! API middleware components

pub mod security;
pub mod session;

pub use security::{security_headers_middleware, MAX_BODY_SIZE};
pub use session::{RequireSession, SessionCookie};
