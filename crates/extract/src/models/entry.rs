use std::fmt::{Display, Formatter, Result as FmtResult};

use super::Book;

/// Whether text matching should respect letter case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}
impl From<bool> for CaseSensitivity {
    fn from(case_sensitive: bool) -> Self {
        match case_sensitive {
            true => Self::Sensitive,
            false => Self::Insensitive,
        }
    }
}

/// One item of the documentation index: an indexed term, its qualifier, and
/// one of the links the index associates with it.
///
/// A term with several links produces several entries sharing `term` and
/// `description` but differing in `book` and `url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Indexed identifier, e.g. `"__and__() "`. May be empty.
    pub term: String,
    /// Qualifier without parentheses, e.g. `"in module operator"`.
    pub description: String,
    pub book: Book,
    /// Link target resolved against the index's base directory. Never empty.
    pub url: String,
}
impl Entry {
    pub fn new(term: impl Into<String>, description: impl Into<String>, book: Book, url: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            description: description.into(),
            book,
            url: url.into(),
        }
    }

    /// Key this entry is stored under: `"{term}\t({description})\t[{book}]"`.
    ///
    /// Unique per link, since the book label carries the link's occurrence.
    pub fn key(&self) -> String {
        format!("{}\t({})\t[{}]", self.term.trim(), self.description, self.book)
    }
}
impl Display for Entry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{};{}", self.key(), self.url)
    }
}
