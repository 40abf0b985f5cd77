use crate::store::BlobStore;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory blob store. Nothing survives the process; used by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.inner.read().expect("store lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_put() {
        let store = MemoryStore::new();
        assert!(store.get("key1").unwrap().is_none());

        store.put("key1", "value1").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("value1"));
    }
}
