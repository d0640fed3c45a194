use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::ResultExt;
use crate::error::{Error, ErrorKind};

/// Section of the documentation a link points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shelf {
    /// Library reference (`library/...`)
    Library,
    /// Python/C API (`c-api/...`)
    CApi,
    /// Language reference (`reference/...`)
    Reference,
    /// Everything else (tutorial, howtos, glossary, ...)
    Other,
}
impl Shelf {
    /// Checked in order, first match wins.
    const MATCHERS: [(&'static str, Shelf); 3] =
        [("library", Shelf::Library), ("c-api", Shelf::CApi), ("reference", Shelf::Reference)];

    /// Classifies a URL or path by the documentation section it contains.
    pub fn classify(url: &str) -> Self {
        Self::MATCHERS
            .iter()
            .find(|(matcher, _)| url.contains(matcher))
            .map(|(_, shelf)| *shelf)
            .unwrap_or(Shelf::Other)
    }

    /// Returns the short label for the shelf.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::Library => "lib",
            Shelf::CApi => "api",
            Shelf::Reference => "ref",
            Shelf::Other => "etc",
        }
    }
}
impl FromStr for Shelf {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "lib" => Self::Library,
            "api" => Self::CApi,
            "ref" => Self::Reference,
            "etc" => Self::Other,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "book",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for Shelf {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Short label identifying which manual a link belongs to, and which of the
/// index term's links it was.
///
/// Displays as the bare shelf label for a term's first link (`lib`), and
/// with the occurrence appended for every other link (`lib/2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Book {
    pub shelf: Shelf,
    /// 1-based position of the link within its index term.
    pub occurrence: u32,
}
impl Book {
    pub fn new(shelf: Shelf, occurrence: u32) -> Self {
        Self { shelf, occurrence }
    }

    /// Pure function of the URL and the link's occurrence index.
    pub fn classify(url: &str, occurrence: u32) -> Self {
        Self::new(Shelf::classify(url), occurrence)
    }
}
impl FromStr for Book {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((label, occurrence)) = s.split_once('/') else {
            return Ok(Self::new(s.parse()?, 1));
        };
        let occurrence = occurrence.parse::<u32>().or_raise(|| ErrorKind::ParseError {
            field: "book occurrence",
            value: s.to_string(),
        })?;
        Ok(Self::new(label.parse()?, occurrence))
    }
}
impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.occurrence {
            1 => write!(f, "{}", self.shelf),
            n => write!(f, "{}/{n}", self.shelf),
        }
    }
}

/// Builds the book label for a link, see [`Book::classify`].
///
/// # Examples
///
/// ```rust
/// use pylookup_extract::classify;
/// assert_eq!(classify("library/functions.html#abs", 1), "lib");
/// assert_eq!(classify("c-api/object.html", 3), "api/3");
/// assert_eq!(classify("glossary.html", 1), "etc");
/// ```
pub fn classify(url: &str, occurrence: u32) -> String {
    Book::classify(url, occurrence).to_string()
}
