//! Streaming parser for generated documentation index pages.

mod machine;
mod resolve;

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::{debug, instrument};

use self::machine::{Event, Machine};
pub use self::machine::ParseStats;
use crate::consts;
use crate::models::Entry;
use crate::sink::EntrySink;

/// Extracts [`Entry`] records from an index page such as `genindex-all.html`.
///
/// The page is expected to be a nested definition list: each `<dt>` is an
/// index term whose links become entries, and `<dd>` blocks hold qualified
/// sub-entries of the term above them. Anything else in the document is
/// ignored, and malformed nesting never produces an error, only fewer
/// entries.
///
/// The document is tokenized, not built into a tree; entries are handed to
/// the sink as soon as their link closes.
///
/// # Examples
///
/// ```rust
/// use pylookup_extract::IndexParser;
///
/// let html = r#"
///     <dl>
///       <dt><a href="library/operator.html#operator.__and__">__and__() (in module operator)</a></dt>
///     </dl>
/// "#;
/// let entries = IndexParser::new("docs").collect(html);
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].term, "__and__() ");
/// assert_eq!(entries[0].description, "in module operator");
/// assert_eq!(entries[0].book.to_string(), "lib");
/// assert_eq!(entries[0].url, "docs/library/operator.html#operator.__and__");
/// ```
#[derive(Debug, Clone)]
pub struct IndexParser {
    base: String,
}
impl IndexParser {
    /// `base` is the directory (or URL) that relative links in the index are
    /// resolved against.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Parses `html`, handing every entry to `sink` in document order.
    #[instrument(skip(self, html, sink), fields(base = %self.base, html_size = html.len()))]
    pub fn parse<S: EntrySink>(&self, html: &str, sink: S) -> ParseStats {
        let tokenizer = Tokenizer::new(Translator::new(&self.base, sink), TokenizerOpts::default());
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));
        // The sink never asks the tokenizer to pause, so a single feed consumes everything.
        let _ = tokenizer.feed(&input);
        tokenizer.end();
        let stats = tokenizer.sink.finish();
        debug!(entries = stats.entries, terms = stats.terms, ignored_links = stats.ignored_links, "parsed index");
        stats
    }

    /// Same as [`parse`](Self::parse), for documents that may not be valid
    /// UTF-8. Invalid byte sequences are replaced with U+FFFD.
    pub fn parse_bytes<S: EntrySink>(&self, html: &[u8], sink: S) -> ParseStats {
        self.parse(&String::from_utf8_lossy(html), sink)
    }

    /// Convenience wrapper collecting every entry into a [`Vec`].
    pub fn collect(&self, html: &str) -> Vec<Entry> {
        let mut entries = Vec::new();
        self.parse(html, |entry: Entry| entries.push(entry));
        entries
    }
}

/// Reduces tokenizer output to [`Event`]s and feeds them to the [`Machine`].
struct Translator<'b, S> {
    machine: RefCell<Machine<'b>>,
    sink: RefCell<S>,
}
impl<'b, S: EntrySink> Translator<'b, S> {
    fn new(base: &'b str, sink: S) -> Self {
        Self {
            machine: RefCell::new(Machine::new(base)),
            sink: RefCell::new(sink),
        }
    }

    fn finish(&self) -> ParseStats {
        self.machine.borrow_mut().finish()
    }

    fn event(tag: &Tag) -> Option<Event<'_>> {
        let name: &str = &tag.name;
        match (tag.kind, name) {
            (TagKind::StartTag, consts::TERM_TAG) => Some(Event::TermStart),
            (TagKind::EndTag, consts::TERM_TAG) => Some(Event::TermEnd),
            (TagKind::StartTag, consts::QUALIFIER_TAG) => Some(Event::QualifierStart),
            (TagKind::EndTag, consts::QUALIFIER_TAG) => Some(Event::QualifierEnd),
            // A self-closing anchor has no text and no matching end tag.
            (TagKind::StartTag, consts::LINK_TAG) if !tag.self_closing => Some(Event::LinkStart {
                href: tag
                    .attrs
                    .iter()
                    .find(|attr| &*attr.name.local == consts::HREF_ATTRIBUTE)
                    .map(|attr| &*attr.value),
            }),
            (TagKind::EndTag, consts::LINK_TAG) => Some(Event::LinkEnd),
            _ => None,
        }
    }
}
impl<S: EntrySink> TokenSink for Translator<'_, S> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<Self::Handle> {
        let event = match &token {
            Token::TagToken(tag) => Self::event(tag),
            Token::CharacterTokens(text) => Some(Event::Text(text)),
            _ => None,
        };
        if let Some(event) = event {
            self.machine.borrow_mut().step(event, &mut *self.sink.borrow_mut());
        }
        TokenSinkResult::Continue
    }
}
