//! Storage infrastructure - Key-value store implementations

mod factory;
mod redb_store;

pub use factory::{StorageFactory, StorageType};
pub use redb_store::RedbStore;
