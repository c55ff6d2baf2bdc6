//! redb-backed key-value store
//!
//! Each partition maps to one redb table keyed by string with raw byte
//! values. redb serializes write transactions, which makes every write
//! method here a single atomic step.

use std::fmt;
use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, error};

use crate::domain::storage::{KeyValueStore, Partition, UpdateFn};
use crate::domain::DomainError;

type Bucket = TableDefinition<'static, &'static str, &'static [u8]>;

fn bucket(partition: Partition) -> Bucket {
    TableDefinition::new(partition.name())
}

fn storage_error(partition: Partition, err: impl Into<redb::Error>) -> DomainError {
    let err: redb::Error = err.into();
    error!(partition = %partition, error = %err, "Store operation failed");
    DomainError::storage(format!("{} operation failed: {}", partition, err))
}

/// Key-value store persisted with redb
pub struct RedbStore {
    db: Database,
}

impl fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Opens (or creates) the database file and every partition
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|e| {
            DomainError::store_unavailable(format!(
                "Failed to open '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), "Opened store");
        Self::with_database(db)
    }

    /// Creates a store that lives only in memory
    pub fn in_memory() -> Result<Self, DomainError> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|e| {
                DomainError::store_unavailable(format!("Failed to create in-memory store: {}", e))
            })?;

        Self::with_database(db)
    }

    fn with_database(db: Database) -> Result<Self, DomainError> {
        let store = Self { db };
        store.create_partitions()?;
        Ok(store)
    }

    fn create_partitions(&self) -> Result<(), DomainError> {
        let unavailable = |partition: Partition, e: redb::Error| {
            DomainError::store_unavailable(format!("Error with {}: {}", partition, e))
        };

        let txn = self
            .db
            .begin_write()
            .map_err(|e| unavailable(Partition::Users, e.into()))?;

        for partition in Partition::ALL {
            txn.open_table(bucket(partition))
                .map_err(|e| unavailable(partition, e.into()))?;
        }

        txn.commit()
            .map_err(|e| unavailable(Partition::Users, e.into()))?;

        Ok(())
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, partition: Partition, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| storage_error(partition, e))?;
        let table = txn
            .open_table(bucket(partition))
            .map_err(|e| storage_error(partition, e))?;

        let value = table
            .get(key)
            .map_err(|e| storage_error(partition, e))?
            .map(|v| v.value().to_vec());

        Ok(value)
    }

    fn put(&self, partition: Partition, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| storage_error(partition, e))?;

        {
            let mut table = txn
                .open_table(bucket(partition))
                .map_err(|e| storage_error(partition, e))?;
            table
                .insert(key, value)
                .map_err(|e| storage_error(partition, e))?;
        }

        txn.commit().map_err(|e| storage_error(partition, e))
    }

    fn delete(&self, partition: Partition, key: &str) -> Result<bool, DomainError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| storage_error(partition, e))?;

        let existed = {
            let mut table = txn
                .open_table(bucket(partition))
                .map_err(|e| storage_error(partition, e))?;
            let removed = table
                .remove(key)
                .map_err(|e| storage_error(partition, e))?;
            removed.is_some()
        };

        txn.commit().map_err(|e| storage_error(partition, e))?;
        Ok(existed)
    }

    fn put_if_absent(
        &self,
        partition: Partition,
        key: &str,
        value: &[u8],
    ) -> Result<bool, DomainError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| storage_error(partition, e))?;

        let inserted = {
            let mut table = txn
                .open_table(bucket(partition))
                .map_err(|e| storage_error(partition, e))?;

            let exists = table
                .get(key)
                .map_err(|e| storage_error(partition, e))?
                .is_some();

            if !exists {
                table
                    .insert(key, value)
                    .map_err(|e| storage_error(partition, e))?;
            }

            !exists
        };

        if inserted {
            txn.commit().map_err(|e| storage_error(partition, e))?;
        } else {
            txn.abort().map_err(|e| storage_error(partition, e))?;
        }

        Ok(inserted)
    }

    fn update(
        &self,
        partition: Partition,
        key: &str,
        f: UpdateFn<'_>,
    ) -> Result<Vec<u8>, DomainError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| storage_error(partition, e))?;

        let updated = {
            let mut table = txn
                .open_table(bucket(partition))
                .map_err(|e| storage_error(partition, e))?;

            let current = table
                .get(key)
                .map_err(|e| storage_error(partition, e))?
                .map(|v| v.value().to_vec());

            // An error here drops the transaction, which aborts it
            let updated = f(current.as_deref())?;

            table
                .insert(key, updated.as_slice())
                .map_err(|e| storage_error(partition, e))?;

            updated
        };

        txn.commit().map_err(|e| storage_error(partition, e))?;
        Ok(updated)
    }

    fn keys(&self, partition: Partition) -> Result<Vec<String>, DomainError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| storage_error(partition, e))?;
        let table = txn
            .open_table(bucket(partition))
            .map_err(|e| storage_error(partition, e))?;

        let mut keys = Vec::new();

        for entry in table.iter().map_err(|e| storage_error(partition, e))? {
            let (key, _) = entry.map_err(|e| storage_error(partition, e))?;
            keys.push(key.value().to_string());
        }

        Ok(keys)
    }
}
