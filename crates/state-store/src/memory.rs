use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::store::{StateStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

/// In-memory state store for testing.
///
/// Provides the same interface as a real web-storage backend. Clones share
/// the same underlying map, matching how every handle to `localStorage`
/// sees the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStateStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail write operations.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.write().unwrap().fail_writes = fail;
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        Ok(self.inner.read().unwrap().entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> crate::Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> crate::Result<()> {
        self.inner.write().unwrap().entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_remove() {
        let store = InMemoryStateStore::new();
        assert!(store.get("checkoutState").unwrap().is_none());

        store.put("checkoutState", r#"{"currentStep":1}"#).unwrap();
        assert_eq!(
            store.get("checkoutState").unwrap().as_deref(),
            Some(r#"{"currentStep":1}"#)
        );

        store.remove("checkoutState").unwrap();
        assert!(store.get("checkoutState").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = InMemoryStateStore::new();
        store.remove("absent").unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let store = InMemoryStateStore::new();
        let other = store.clone();

        store.put("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_fail_writes() {
        let store = InMemoryStateStore::new();
        store.set_fail_writes(true);

        let err = store.put("k", "v").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(store.is_empty());
    }
}
