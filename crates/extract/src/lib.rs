//! Extraction of index entries from generated Python documentation.
//!
//! The documentation's full index page (`genindex-all.html`) lists every
//! indexed term with one or more links into the manuals. This crate turns
//! that page into a stream of [`Entry`] records; it performs no I/O itself.

mod consts;
pub mod error;
pub mod models;
mod parser;
mod sink;

pub use crate::models::{Book, CaseSensitivity, Entry, Shelf, classify};
pub use crate::parser::{IndexParser, ParseStats};
pub use crate::sink::EntrySink;

