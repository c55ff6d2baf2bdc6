//! Provisioning domain
//!
//! Error taxonomy for blog creation and the seams to the external
//! provisioning action and the port allocator.

mod error;
mod ports;
mod provisioner;

pub use error::ProvisionError;
pub use ports::{PortAllocator, PortRange};
pub use provisioner::{ProvisionRequest, Provisioner, ProvisionerError};

#[cfg(test)]
pub use provisioner::mock;
