//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::config::StorageConfig;
use crate::domain::storage::KeyValueStore;
use crate::domain::DomainError;

use super::redb_store::RedbStore;

/// Supported storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// redb database file (default)
    File,
    /// redb in-memory backend (for testing/development)
    InMemory,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" | "redb" | "disk" => Some(Self::File),
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            _ => None,
        }
    }
}

/// Factory for opening the process-wide store
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Opens the store described by the configuration
    ///
    /// Any failure here is fatal for the process.
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, DomainError> {
        let storage_type = StorageType::from_str(&config.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown storage backend '{}'", config.backend))
        })?;

        info!("Storage backend: {:?}", storage_type);

        match storage_type {
            StorageType::File => Ok(Arc::new(RedbStore::open(&config.path)?)),
            StorageType::InMemory => Ok(Arc::new(RedbStore::in_memory()?)),
        }
    }
}
