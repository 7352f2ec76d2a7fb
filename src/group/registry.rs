//! Group Registry
//!
//! Name -> group lookup shared by the HTTP server and the node setup code.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use super::{Getter, Group};
use crate::error::{CacheError, Result};
use crate::peers::protocol::is_dot_segment;

// == Group Registry ==
/// Explicit registry of cache groups.
///
/// Groups are created during setup and then only read; lookups may run
/// concurrently with the creation of other groups.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Create ==
    /// Creates and registers a group. Fails if the name is taken or cannot
    /// be used as a URL path segment.
    pub fn create(
        &self,
        name: &str,
        cache_bytes: usize,
        getter: impl Getter + 'static,
    ) -> Result<Arc<Group>> {
        if name.is_empty() || name.contains('/') || is_dot_segment(name) {
            return Err(CacheError::BadRequest(format!("invalid group name {:?}", name)));
        }

        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        if groups.contains_key(name) {
            return Err(CacheError::DuplicateGroup(name.to_string()));
        }

        let group = Arc::new(Group::new(name, cache_bytes, getter));
        groups.insert(name.to_string(), group.clone());
        info!("group {} created with {} cache bytes", name, cache_bytes);
        Ok(group)
    }

    // == Lookup ==
    pub fn lookup(&self, name: &str) -> Option<Arc<Group>> {
        let groups = self.groups.read().unwrap_or_else(|e| e.into_inner());
        groups.get(name).cloned()
    }

    /// Unregisters a group, returning it if it existed.
    pub fn remove(&self, name: &str) -> Option<Arc<Group>> {
        let mut groups = self.groups.write().unwrap_or_else(|e| e.into_inner());
        groups.remove(name)
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let groups = self.groups.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = groups.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    fn echo(key: &str) -> std::result::Result<Vec<u8>, LoadError> {
        Ok(key.as_bytes().to_vec())
    }

    #[test]
    fn test_create_and_lookup() {
        let registry = GroupRegistry::new();
        let group = registry.create("scores", 2 << 10, echo).unwrap();

        let found = registry.lookup("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &found));
        assert_eq!(found.name(), "scores");
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let registry = GroupRegistry::new();
        registry.create("scores", 0, echo).unwrap();

        let err = registry.create("scores", 0, echo).unwrap_err();
        assert_eq!(err, CacheError::DuplicateGroup("scores".into()));
    }

    #[test]
    fn test_unroutable_names_are_rejected() {
        let registry = GroupRegistry::new();

        for name in ["", ".", "..", "a/b"] {
            let err = registry.create(name, 0, echo).unwrap_err();
            assert!(matches!(err, CacheError::BadRequest(_)), "{:?}", name);
        }
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_remove_and_names() {
        let registry = GroupRegistry::new();
        registry.create("b", 0, echo).unwrap();
        registry.create("a", 0, echo).unwrap();

        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert_eq!(registry.names(), vec!["b"]);
    }

    #[test]
    fn test_lookup_during_concurrent_creation() {
        let registry = Arc::new(GroupRegistry::new());
        registry.create("scores", 0, echo).unwrap();

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.create(&format!("group{}", i), 0, echo).unwrap();
                })
            })
            .collect();

        for _ in 0..1000 {
            assert!(registry.lookup("scores").is_some());
        }
        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(registry.names().len(), 9);
    }

    #[tokio::test]
    async fn test_registered_group_serves_values() {
        let registry = GroupRegistry::new();
        registry.create("scores", 0, echo).unwrap();

        let value = registry.lookup("scores").unwrap().get("Tom").await.unwrap();
        assert_eq!(value.to_string(), "Tom");
    }
}
