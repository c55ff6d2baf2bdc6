//! Key-value store trait definition

use std::fmt::Debug;

use crate::domain::DomainError;

use super::partition::Partition;

/// Closure applied by [`KeyValueStore::update`] to the current value of a key
pub type UpdateFn<'a> = &'a mut dyn FnMut(Option<&[u8]>) -> Result<Vec<u8>, DomainError>;

/// Durable, transactional key-value store organized into partitions
///
/// Every method runs inside its own read or write transaction. Write
/// transactions are serialized by the backend, so `put_if_absent` and
/// `update` are atomic with respect to every other call.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Reads the value stored under `key`
    fn get(&self, partition: Partition, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Writes `value` under `key`, replacing any previous value
    fn put(&self, partition: Partition, key: &str, value: &[u8]) -> Result<(), DomainError>;

    /// Removes `key`, returns true if it was present
    fn delete(&self, partition: Partition, key: &str) -> Result<bool, DomainError>;

    /// Writes `value` only if `key` is absent, returns true if written
    fn put_if_absent(
        &self,
        partition: Partition,
        key: &str,
        value: &[u8],
    ) -> Result<bool, DomainError>;

    /// Replaces the value under `key` with the result of `f`, returns the new value
    ///
    /// If `f` fails nothing is written.
    fn update(
        &self,
        partition: Partition,
        key: &str,
        f: UpdateFn<'_>,
    ) -> Result<Vec<u8>, DomainError>;

    /// Lists every key in the partition
    fn keys(&self, partition: Partition) -> Result<Vec<String>, DomainError>;

    /// Checks if a key exists
    fn contains(&self, partition: Partition, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(partition, key)?.is_some())
    }

    /// Verifies the store can serve reads
    fn ping(&self) -> Result<(), DomainError> {
        self.get(Partition::Users, "").map(|_| ())
    }
}
