use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::{OptionExt, ResultExt};
use pylookup_extract::{Book, Entry};

use crate::error::{Error, ErrorKind};

/// Stored value of an entry, encoded as `description;book;url`.
///
/// The term is not part of the record; it's in the key the record is stored
/// under. Semicolons in the description are written as commas, so decoding
/// splits on the first two semicolons and leaves the URL intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub description: String,
    pub book: Book,
    pub url: String,
}
impl From<&Entry> for Record {
    fn from(entry: &Entry) -> Self {
        Self {
            description: entry.description.clone(),
            book: entry.book,
            url: entry.url.clone(),
        }
    }
}
impl From<Entry> for Record {
    fn from(entry: Entry) -> Self {
        Self {
            description: entry.description,
            book: entry.book,
            url: entry.url,
        }
    }
}
impl FromStr for Record {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ';');
        let (Some(description), Some(book), Some(url)) = (parts.next(), parts.next(), parts.next()) else {
            exn::bail!(ErrorKind::InvalidRecord(s.to_string()));
        };
        let url = Some(url).filter(|url| !url.is_empty()).ok_or_raise(|| ErrorKind::InvalidRecord(s.to_string()))?;
        Ok(Self {
            description: description.to_string(),
            book: book.parse::<Book>().or_raise(|| ErrorKind::InvalidRecord(s.to_string()))?,
            url: url.to_string(),
        })
    }
}
impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{};{};{}", self.description.replace(';', ","), self.book, self.url)
    }
}
