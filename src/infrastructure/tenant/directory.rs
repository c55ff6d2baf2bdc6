//! Global blog name directory

use std::sync::Arc;

use crate::domain::storage::{KeyValueStore, Partition};
use crate::domain::tenant::BlogName;
use crate::domain::DomainError;

/// Maps blog names to their external address
///
/// Owns the `BlogMapping` partition. An entry exists for every name that has
/// been claimed, independent of which identity owns it.
#[derive(Debug, Clone)]
pub struct TenantDirectory {
    store: Arc<dyn KeyValueStore>,
}

impl TenantDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn is_taken(&self, name: &BlogName) -> Result<bool, DomainError> {
        self.store.contains(Partition::BlogMapping, name.as_str())
    }

    /// Unconditionally record `name -> address`
    pub fn reserve(&self, name: &BlogName, address: &str) -> Result<(), DomainError> {
        self.store
            .put(Partition::BlogMapping, name.as_str(), address.as_bytes())
    }

    /// Record `name -> address` unless the name is already taken
    ///
    /// Check and write happen in one transaction: of any number of
    /// concurrent claims for the same name exactly one returns true.
    pub fn claim(&self, name: &BlogName, address: &str) -> Result<bool, DomainError> {
        self.store
            .put_if_absent(Partition::BlogMapping, name.as_str(), address.as_bytes())
    }

    /// Drop a claim for a blog that was never created
    pub fn release(&self, name: &BlogName) -> Result<(), DomainError> {
        self.store.delete(Partition::BlogMapping, name.as_str())?;
        Ok(())
    }

    /// Every claimed name
    pub fn names(&self) -> Result<Vec<String>, DomainError> {
        self.store.keys(Partition::BlogMapping)
    }

    pub fn address_of(&self, name: &BlogName) -> Result<Option<String>, DomainError> {
        Ok(self
            .store
            .get(Partition::BlogMapping, name.as_str())?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::RedbStore;

    fn directory() -> TenantDirectory {
        TenantDirectory::new(Arc::new(RedbStore::in_memory().unwrap()))
    }

    fn name(raw: &str) -> BlogName {
        BlogName::sanitize(raw).unwrap()
    }

    #[test]
    fn test_claim_and_is_taken() {
        let directory = directory();

        assert!(!directory.is_taken(&name("MyBlog")).unwrap());
        assert!(directory.claim(&name("MyBlog"), "MyBlog.goblog.pw").unwrap());
        assert!(directory.is_taken(&name("MyBlog")).unwrap());
        assert!(!directory.claim(&name("MyBlog"), "other").unwrap());

        assert_eq!(
            directory.address_of(&name("MyBlog")).unwrap(),
            Some("MyBlog.goblog.pw".to_string())
        );
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let directory = directory();

        assert!(directory.claim(&name("MyBlog"), "MyBlog.goblog.pw").unwrap());
        assert!(directory.claim(&name("myblog"), "myblog.goblog.pw").unwrap());
    }

    #[test]
    fn test_reserve_overwrites() {
        let directory = directory();

        directory.reserve(&name("MyBlog"), "first").unwrap();
        directory.reserve(&name("MyBlog"), "second").unwrap();

        assert_eq!(
            directory.address_of(&name("MyBlog")).unwrap(),
            Some("second".to_string())
        );
    }

    #[test]
    fn test_release() {
        let directory = directory();

        directory.claim(&name("MyBlog"), "MyBlog.goblog.pw").unwrap();
        directory.release(&name("MyBlog")).unwrap();
        assert!(!directory.is_taken(&name("MyBlog")).unwrap());

        // Releasing twice is harmless
        directory.release(&name("MyBlog")).unwrap();
        assert!(directory.names().unwrap().is_empty());
    }
}
