use crate::store::BlobStore;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

/// Durable blob store over a single fjall partition.
pub struct FjallStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace.open_partition("state", PartitionCreateOptions::default())?;
        Ok(FjallStore {
            keyspace,
            partition,
        })
    }
}

impl BlobStore for FjallStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.partition.get(key)? {
            Some(slice) => {
                debug!("Store HIT for key: {key}");
                Ok(Some(String::from_utf8(slice.to_vec())?))
            }
            None => {
                debug!("Store MISS for key: {key}");
                Ok(None)
            }
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key, value)?;
        // Write-through: every mutation is durable before the call returns.
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {key}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        assert!(store.get("key1").unwrap().is_none());

        store.put("key1", "value1").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("value1"));

        store.put("key1", "value2").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("value2"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FjallStore::open(dir.path()).unwrap();
            store.put("key1", "persisted").unwrap();
        }

        let store = FjallStore::open(dir.path()).unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("persisted"));
    }
}
