//! Storage domain - Partitioned key-value store abstraction

mod partition;
mod repository;

pub use partition::Partition;
pub use repository::{KeyValueStore, UpdateFn};

#[cfg(test)]
pub use repository::mock;
