//! Port assignment for new tenants

use std::fmt::Debug;

use crate::domain::tenant::BlogName;
use crate::domain::DomainError;

/// Half-open range `[min, max)` ports are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl PortRange {
    /// Create a range, rejecting empty ones
    pub fn new(min: u16, max: u16) -> Result<Self, DomainError> {
        if min >= max {
            return Err(DomainError::configuration(format!(
                "Port range [{}, {}) is empty",
                min, max
            )));
        }

        Ok(Self { min, max })
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.min..self.max).contains(&port)
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            min: 2000,
            max: 65000,
        }
    }
}

/// Hands out ports for newly provisioned blogs
pub trait PortAllocator: Send + Sync + Debug {
    /// Draw a port for `name`
    fn allocate(&self, name: &BlogName) -> Result<u16, DomainError>;

    /// Give back a port drawn for a blog that was never created
    fn release(&self, port: u16) -> Result<(), DomainError>;
}
