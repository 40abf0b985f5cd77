pub mod disk;
pub mod memory;

use crate::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;

/// Blob key for the watchlist of preferred market pairs.
pub const WATCHLIST_KEY: &str = "preferredMarketPairs";
/// Blob key for the conversion history log.
pub const HISTORY_KEY: &str = "conversionHistory";
/// Blob key for the favorite pairs set.
pub const FAVORITES_KEY: &str = "favoritePairs";

/// String-blob persistence keyed by name. Writes are durable before the
/// call returns; there are no transactional guarantees across keys.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Opens the on-disk store at the configured data path.
pub fn open(config: &AppConfig) -> Result<Arc<dyn BlobStore>> {
    let path = config.data_path()?;
    Ok(Arc::new(disk::FjallStore::open(&path)?))
}
