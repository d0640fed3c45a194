//! Key-value store and lookup queries for documentation index entries.
//!
//! The store is a cache of one index page: every update replaces its contents
//! entirely, and deleting the database loses nothing that can't be rebuilt
//! from the page again.
//!
//! # Layout
//! Each [`Entry`](pylookup_extract::Entry) is stored under its
//! [key](pylookup_extract::Entry::key) (`term\t(description)\t[book]`), with
//! a [`Record`] encoded as `description;book;url` as the value. Lookups
//! select keys by substring, see [`query`].

mod consts;
mod db;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod memory;
pub mod query;
mod record;
mod repo;
mod store;

pub use crate::db::Database;
#[cfg(any(test, feature = "mock"))]
pub use crate::memory::MemoryStore;
pub use crate::query::{Query, cache_keys, lookup, select};
pub use crate::record::Record;
pub use crate::repo::Repository;
pub use crate::store::{EntryStream, Store};
