//! Port allocators
//!
//! `RandomPortAllocator` draws independently per call and accepts the
//! chance of two blogs landing on the same port. `ReservingPortAllocator`
//! records each draw in the `PortBucket` partition and redraws on collision.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::domain::provisioning::{PortAllocator, PortRange};
use crate::domain::storage::{KeyValueStore, Partition};
use crate::domain::tenant::BlogName;
use crate::domain::DomainError;

const MAX_RESERVATION_ATTEMPTS: usize = 32;

/// Uniform random draw with no collision detection
#[derive(Debug, Clone, Default)]
pub struct RandomPortAllocator {
    range: PortRange,
}

impl RandomPortAllocator {
    pub fn new(range: PortRange) -> Self {
        Self { range }
    }
}

impl PortAllocator for RandomPortAllocator {
    fn allocate(&self, _name: &BlogName) -> Result<u16, DomainError> {
        Ok(rand::thread_rng().gen_range(self.range.min..self.range.max))
    }

    fn release(&self, _port: u16) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Random draw marked as used in the port partition
#[derive(Debug, Clone)]
pub struct ReservingPortAllocator {
    store: Arc<dyn KeyValueStore>,
    range: PortRange,
    max_attempts: usize,
}

impl ReservingPortAllocator {
    pub fn new(store: Arc<dyn KeyValueStore>, range: PortRange) -> Self {
        Self {
            store,
            range,
            max_attempts: MAX_RESERVATION_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Blog name holding `port`, if any
    pub fn holder_of(&self, port: u16) -> Result<Option<String>, DomainError> {
        Ok(self
            .store
            .get(Partition::PortBucket, &port.to_string())?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

impl PortAllocator for ReservingPortAllocator {
    fn allocate(&self, name: &BlogName) -> Result<u16, DomainError> {
        let mut rng = rand::thread_rng();

        for _ in 0..self.max_attempts {
            let port = rng.gen_range(self.range.min..self.range.max);

            if self.store.put_if_absent(
                Partition::PortBucket,
                &port.to_string(),
                name.as_str().as_bytes(),
            )? {
                return Ok(port);
            }

            debug!(port, "Port already reserved, drawing again");
        }

        Err(DomainError::conflict(format!(
            "No free port found in [{}, {}) after {} attempts",
            self.range.min, self.range.max, self.max_attempts
        )))
    }

    fn release(&self, port: u16) -> Result<(), DomainError> {
        self.store.delete(Partition::PortBucket, &port.to_string())?;
        Ok(())
    }
}
