//! In-memory store for testing.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::record::Record;
use crate::store::{EntryStream, Store};

/// In-memory [`Store`] for testing.
///
/// Records are kept encoded in a `BTreeMap` behind a [`RwLock`], so keys come
/// out sorted and every trait method works on `&self`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw `(key, value)` pairs.
    ///
    /// Values are stored as given, without checking that they decode.
    pub fn with_entries(entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, key: &str, record: &Record) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), record.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn rebuild(&self, mut entries: EntryStream<'_>) -> Result<u64> {
        // Built aside and swapped in, so readers never see a partial index.
        let mut fresh = BTreeMap::new();
        let mut count = 0u64;
        while let Some(entry) = entries.next().await {
            let entry = entry?;
            fresh.insert(entry.key(), Record::from(entry).to_string());
            count += 1;
        }
        *self.entries.write().await = fresh;
        Ok(count)
    }

    async fn close(&self) {}
}
