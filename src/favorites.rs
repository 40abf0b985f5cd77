use crate::pair::PairCode;
use crate::store::{BlobStore, FAVORITES_KEY};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("{0} is already in your favorites")]
    AlreadySaved(PairCode),
    #[error("{0} is not in your favorites")]
    NotSaved(PairCode),
    #[error("failed to persist favorites")]
    Persist(#[source] anyhow::Error),
}

/// Insertion-ordered set of favorite pair codes, persisted as a JSON
/// array of strings.
pub struct Favorites {
    codes: Vec<PairCode>,
    store: Arc<dyn BlobStore>,
}

impl Favorites {
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let codes: Vec<PairCode> = match store.get(FAVORITES_KEY) {
            Ok(Some(blob)) => serde_json::from_str::<Vec<String>>(&blob)
                .unwrap_or_else(|e| {
                    warn!("Malformed favorites blob, treating as empty: {e}");
                    Vec::new()
                })
                .into_iter()
                .filter_map(|code| code.parse().ok())
                .collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites, treating as empty: {e}");
                Vec::new()
            }
        };

        Favorites { codes, store }
    }

    pub fn add(&mut self, code: PairCode) -> Result<(), FavoritesError> {
        if self.contains(&code) {
            return Err(FavoritesError::AlreadySaved(code));
        }
        self.codes.push(code);
        self.persist()
    }

    pub fn remove(&mut self, code: &PairCode) -> Result<(), FavoritesError> {
        let Some(index) = self.codes.iter().position(|c| c == code) else {
            return Err(FavoritesError::NotSaved(code.clone()));
        };
        self.codes.remove(index);
        self.persist()
    }

    pub fn contains(&self, code: &PairCode) -> bool {
        self.codes.contains(code)
    }

    pub fn codes(&self) -> &[PairCode] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn persist(&self) -> Result<(), FavoritesError> {
        let strings: Vec<&str> = self.codes.iter().map(PairCode::as_str).collect();
        let blob = serde_json::to_string(&strings)
            .map_err(|e| FavoritesError::Persist(e.into()))?;
        self.store
            .put(FAVORITES_KEY, &blob)
            .map_err(FavoritesError::Persist)
    }
}
