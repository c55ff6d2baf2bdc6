//! Domain layer - Core business logic and entities

pub mod error;
pub mod provisioning;
pub mod session;
pub mod storage;
pub mod tenant;
pub mod user;

pub use error::DomainError;
pub use provisioning::{
    PortAllocator, PortRange, ProvisionError, ProvisionRequest, Provisioner, ProvisionerError,
};
pub use session::{SessionRecord, SessionToken};
pub use storage::{KeyValueStore, Partition};
pub use tenant::{BlogName, BlogNameError, TenantBlog};
pub use user::{Identity, IdentityError};
