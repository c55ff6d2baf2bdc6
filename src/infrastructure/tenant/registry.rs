//! Per-identity blog ownership lists

use std::sync::Arc;

use tracing::warn;

use crate::domain::storage::{KeyValueStore, Partition};
use crate::domain::tenant::{BlogName, TenantBlog};
use crate::domain::{DomainError, Identity};

/// Maps an identity to the ordered list of blogs it owns
///
/// Owns the `UserToBlog` partition, storing a JSON array per identity.
#[derive(Debug, Clone)]
pub struct TenantRegistry {
    store: Arc<dyn KeyValueStore>,
}

/// Missing or unreadable records count as an empty list
fn decode_blogs(bytes: Option<&[u8]>) -> Vec<TenantBlog> {
    let Some(bytes) = bytes else {
        return Vec::new();
    };

    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        warn!(error = %e, "Discarding malformed blog list");
        Vec::new()
    })
}

impl TenantRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Blogs owned by `identity`, in creation order
    pub fn blogs_of(&self, identity: &Identity) -> Result<Vec<TenantBlog>, DomainError> {
        let bytes = self.store.get(Partition::UserToBlog, identity.as_str())?;
        Ok(decode_blogs(bytes.as_deref()))
    }

    /// Append a blog to the identity's list in a single transaction
    pub fn add_blog(
        &self,
        identity: &Identity,
        name: &BlogName,
        address: &str,
    ) -> Result<(), DomainError> {
        let blog = TenantBlog::new(name.as_str(), address);

        self.store
            .update(Partition::UserToBlog, identity.as_str(), &mut |current| {
                let mut blogs = decode_blogs(current);
                blogs.push(blog.clone());
                serde_json::to_vec(&blogs).map_err(|e| {
                    DomainError::internal(format!("Failed to encode blog list: {}", e))
                })
            })?;

        Ok(())
    }

    /// Every blog name owned by any identity
    pub fn owned_names(&self) -> Result<Vec<String>, DomainError> {
        let mut names = Vec::new();

        for key in self.store.keys(Partition::UserToBlog)? {
            let bytes = self.store.get(Partition::UserToBlog, &key)?;
            names.extend(decode_blogs(bytes.as_deref()).into_iter().map(|b| b.name));
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::RedbStore;

    fn create_registry() -> (TenantRegistry, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(RedbStore::in_memory().unwrap());
        (TenantRegistry::new(Arc::clone(&store)), store)
    }

    fn identity(value: &str) -> Identity {
        Identity::new(value).unwrap()
    }

    fn name(raw: &str) -> BlogName {
        BlogName::sanitize(raw).unwrap()
    }

    #[test]
    fn test_blogs_of_unknown_identity_is_empty() {
        let (registry, _) = create_registry();
        assert!(registry.blogs_of(&identity("a@x.com")).unwrap().is_empty());
    }

    #[test]
    fn test_add_keeps_creation_order() {
        let (registry, _) = create_registry();
        let owner = identity("a@x.com");

        registry.add_blog(&owner, &name("First"), "First.goblog.pw").unwrap();
        registry.add_blog(&owner, &name("Second"), "Second.goblog.pw").unwrap();

        assert_eq!(
            registry.blogs_of(&owner).unwrap(),
            vec![
                TenantBlog::new("First", "First.goblog.pw"),
                TenantBlog::new("Second", "Second.goblog.pw"),
            ]
        );
    }

    #[test]
    fn test_lists_are_per_identity() {
        let (registry, _) = create_registry();

        registry
            .add_blog(&identity("a@x.com"), &name("Alpha"), "Alpha.goblog.pw")
            .unwrap();

        assert!(registry.blogs_of(&identity("b@x.com")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_record_reads_as_empty() {
        let (registry, store) = create_registry();
        let owner = identity("a@x.com");
        store
            .put(Partition::UserToBlog, owner.as_str(), b"{not json")
            .unwrap();

        assert!(registry.blogs_of(&owner).unwrap().is_empty());

        registry.add_blog(&owner, &name("Fresh"), "Fresh.goblog.pw").unwrap();
        assert_eq!(
            registry.blogs_of(&owner).unwrap(),
            vec![TenantBlog::new("Fresh", "Fresh.goblog.pw")]
        );
    }

    #[test]
    fn test_stored_format() {
        let (registry, store) = create_registry();
        let owner = identity("a@x.com");

        registry.add_blog(&owner, &name("MyBlog"), "MyBlog.goblog.pw").unwrap();

        let bytes = store.get(Partition::UserToBlog, owner.as_str()).unwrap().unwrap();
        assert_eq!(
            bytes,
            br#"[{"blogname":"MyBlog","website":"MyBlog.goblog.pw"}]"#.to_vec()
        );
    }

    #[test]
    fn test_concurrent_adds_lose_nothing() {
        let (registry, _) = create_registry();
        let owner = identity("a@x.com");

        let handles: Vec<_> = ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"]
            .into_iter()
            .map(|raw| {
                let registry = registry.clone();
                let owner = owner.clone();
                std::thread::spawn(move || {
                    let blog = name(raw);
                    registry
                        .add_blog(&owner, &blog, &blog.address("goblog.pw"))
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.blogs_of(&owner).unwrap().len(), 6);
        assert_eq!(registry.owned_names().unwrap().len(), 6);
    }
}
