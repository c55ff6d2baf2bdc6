//! Tenant infrastructure module
//!
//! Name uniqueness (`BlogMapping`), ownership lists (`UserToBlog`) and port
//! assignment (`PortBucket`).

mod directory;
mod ports;
mod registry;

pub use directory::TenantDirectory;
pub use ports::{RandomPortAllocator, ReservingPortAllocator};
pub use registry::TenantRegistry;
