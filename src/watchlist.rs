use crate::pair::{PairCode, TrackedPair, default_pairs};
use crate::store::{BlobStore, WATCHLIST_KEY};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("{0} is already in the watchlist")]
    AlreadyTracked(PairCode),
    #[error("{0} is not in the watchlist")]
    NotTracked(PairCode),
    #[error("failed to persist watchlist")]
    Persist(#[source] anyhow::Error),
}

/// Bounded, insertion-ordered set of tracked pairs.
///
/// Insertion order defines eviction order: adding beyond capacity drops
/// the oldest-inserted pair first. Every mutation is written through to
/// the store before returning.
pub struct Watchlist {
    pairs: Vec<TrackedPair>,
    capacity: usize,
    store: Arc<dyn BlobStore>,
}

impl Watchlist {
    /// Loads the persisted watchlist, falling back to the default pairs
    /// when nothing usable is stored. Defaults are not persisted until
    /// the first mutation.
    pub fn load(store: Arc<dyn BlobStore>, capacity: usize) -> Self {
        let pairs = match store.get(WATCHLIST_KEY) {
            Ok(Some(blob)) => decode(&blob),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read watchlist, starting from defaults: {e}");
                Vec::new()
            }
        };

        let pairs = if pairs.is_empty() {
            debug!("No stored watchlist, seeding defaults");
            default_pairs()
        } else {
            pairs
        };

        Watchlist {
            pairs,
            capacity,
            store,
        }
    }

    /// Adds a pair at the newest position, evicting the oldest pair when
    /// at capacity. A pair that is already tracked is rejected without
    /// touching the list.
    pub fn add(&mut self, pair: TrackedPair) -> Result<(), WatchlistError> {
        if self.contains(&pair.code) {
            return Err(WatchlistError::AlreadyTracked(pair.code));
        }

        // A blob written under a larger `max_tracked_pairs` can be over
        // capacity after reload, so evict until the new pair fits.
        while !self.pairs.is_empty() && self.pairs.len() >= self.capacity {
            let evicted = self.pairs.remove(0);
            warn!(
                "Watchlist limit ({}) reached, removed oldest pair {}",
                self.capacity, evicted.code
            );
        }

        debug!("Tracking pair {}", pair.code);
        self.pairs.push(pair);
        self.persist()
    }

    pub fn remove(&mut self, code: &PairCode) -> Result<(), WatchlistError> {
        let Some(index) = self.pairs.iter().position(|p| &p.code == code) else {
            return Err(WatchlistError::NotTracked(code.clone()));
        };

        debug!("Untracking pair {code}");
        self.pairs.remove(index);
        self.persist()
    }

    /// Tracked pairs in insertion order. Should never exceed capacity,
    /// but consumers re-slice defensively.
    pub fn tracked(&self) -> &[TrackedPair] {
        &self.pairs
    }

    pub fn contains(&self, code: &PairCode) -> bool {
        self.pairs.iter().any(|p| &p.code == code)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn persist(&self) -> Result<(), WatchlistError> {
        self.store
            .put(WATCHLIST_KEY, &encode(&self.pairs))
            .map_err(WatchlistError::Persist)
    }
}

/// Object form keyed by pair code, insertion order preserved.
fn encode(pairs: &[TrackedPair]) -> String {
    let mut map = Map::new();
    for pair in pairs {
        if let Ok(value) = serde_json::to_value(pair) {
            map.insert(pair.code.to_string(), value);
        }
    }
    Value::Object(map).to_string()
}

/// A malformed blob is treated as absent; unreadable entries are skipped.
fn decode(blob: &str) -> Vec<TrackedPair> {
    let Ok(Value::Object(map)) = serde_json::from_str(blob) else {
        warn!("Malformed watchlist blob, treating as empty");
        return Vec::new();
    };

    map.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!("Skipping unreadable watchlist entry {key}: {e}");
                None
            }
        })
        .collect()
}
