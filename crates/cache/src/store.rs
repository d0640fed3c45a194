//! Key-value store trait for index entries.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use pylookup_extract::Entry;

use crate::error::Result;
use crate::record::Record;

/// Entries arriving from the parser, in document order.
///
/// An `Err` item means the producer failed part way; the store must then
/// discard everything received so far.
pub type EntryStream<'a> = Pin<Box<dyn Stream<Item = Result<Entry>> + Send + 'a>>;

/// Unified interface for the entry store.
///
/// Keys are case-sensitive strings (see [`Entry::key`]), values are encoded
/// [`Record`]s. Reads return the raw encoded value so that lookups can sort
/// and print without decoding every match.
///
/// # Examples
///
/// ```
/// use pylookup_cache::{Record, Store, error::Result};
///
/// async fn url_of(store: &dyn Store, key: &str) -> Result<Option<String>> {
///     Ok(match store.get(key).await? {
///         Some(raw) => Some(raw.parse::<Record>()?.url),
///         None => None,
///     })
/// }
/// ```
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or overwrite a single record.
    async fn put(&self, key: &str, record: &Record) -> Result<()>;

    /// Raw encoded value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Every key in the store, sorted.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Returns `true` if a record was deleted, `false` if the key was not found.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Replace the entire contents of the store with `entries`.
    ///
    /// All-or-nothing: either every entry of the stream is stored and nothing
    /// else remains, or the previous contents are left untouched. The first
    /// `Err` item from the stream is returned as is. Entries with a duplicate
    /// key overwrite earlier ones. Returns the number of entries stored.
    async fn rebuild(&self, entries: EntryStream<'_>) -> Result<u64>;

    /// Release the store. It should not be used afterwards.
    async fn close(&self);
}
