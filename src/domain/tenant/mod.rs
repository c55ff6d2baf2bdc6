//! Tenant domain
//!
//! Sanitized blog names and the hosted blogs they identify.

mod entity;

pub use entity::{BlogName, BlogNameError, TenantBlog, MIN_BLOG_NAME_LENGTH};
