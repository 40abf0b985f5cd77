use crate::store::{BlobStore, HISTORY_KEY};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::warn;

/// Most-recent-first record cap.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn now(amount: f64, from: impl Into<String>, to: impl Into<String>, result: f64) -> Self {
        HistoryRecord {
            amount,
            from: from.into(),
            to: to.into(),
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded conversion log, most recent first, evicted from the tail.
pub struct HistoryLog {
    records: VecDeque<HistoryRecord>,
    store: Arc<dyn BlobStore>,
}

impl HistoryLog {
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let mut records: VecDeque<HistoryRecord> = match store.get(HISTORY_KEY) {
            Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
                warn!("Malformed history blob, treating as empty: {e}");
                VecDeque::new()
            }),
            Ok(None) => VecDeque::new(),
            Err(e) => {
                warn!("Failed to read history, treating as empty: {e}");
                VecDeque::new()
            }
        };
        records.truncate(HISTORY_CAPACITY);

        HistoryLog { records, store }
    }

    pub fn record(&mut self, record: HistoryRecord) -> Result<()> {
        self.records.push_front(record);
        self.records.truncate(HISTORY_CAPACITY);
        self.persist()
    }

    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let blob = serde_json::to_string(&self.records)?;
        self.store
            .put(HISTORY_KEY, &blob)
            .context("Failed to persist conversion history")
    }
}
