mod book;
mod entry;

pub use self::book::{Book, Shelf, classify};
pub use self::entry::{CaseSensitivity, Entry};
