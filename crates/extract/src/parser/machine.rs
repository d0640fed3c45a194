//! The index state machine.
//!
//! Markup is reduced to a handful of structural [`Event`]s before it reaches
//! the machine, so everything here is independent of the HTML tokenizer.
//! All mutable state lives in [`Machine`]; per-term state lives in
//! [`TermBlock`] and is dropped on every term boundary.

use super::resolve::resolve;
use crate::consts::{PARENTHESES_REGEX, QUALIFIER_REGEX};
use crate::models::{Book, Entry};
use crate::sink::EntrySink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event<'a> {
    /// `<dt>`
    TermStart,
    /// `</dt>`
    TermEnd,
    /// `<dd>`
    QualifierStart,
    /// `</dd>`
    QualifierEnd,
    /// `<a>`, with its `href` attribute if it has one.
    LinkStart { href: Option<&'a str> },
    /// `</a>`
    LinkEnd,
    Text(&'a str),
}

/// Counters collected during a parse, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Entries handed to the sink.
    pub entries: u64,
    /// Term blocks opened.
    pub terms: u64,
    /// Links that were skipped: outside any term, nested, or without a target.
    pub ignored_links: u64,
}

#[derive(Debug)]
struct OpenLink {
    url: String,
    text: String,
}

#[derive(Debug, Default)]
struct TermBlock {
    link_count: u32,
    link: Option<OpenLink>,
    /// Depth of anchors opened inside the current link.
    nested: u32,
    /// Text outside of any link.
    label: String,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Term(TermBlock),
}

#[derive(Debug)]
pub(crate) struct Machine<'b> {
    base: &'b str,
    phase: Phase,
    /// Nesting depth of `<dd>`; inside the qualifier region while non-zero.
    qualifier_depth: usize,
    /// Established term, carried over into nested qualifier blocks.
    term: String,
    /// Established description, shared by every link of a term.
    description: String,
    stats: ParseStats,
}

impl<'b> Machine<'b> {
    pub(crate) fn new(base: &'b str) -> Self {
        Self {
            base,
            phase: Phase::Idle,
            qualifier_depth: 0,
            term: String::new(),
            description: String::new(),
            stats: ParseStats::default(),
        }
    }

    pub(crate) fn step<S: EntrySink + ?Sized>(&mut self, event: Event<'_>, sink: &mut S) {
        match event {
            Event::TermStart => {
                // An unclosed term is implicitly closed by the next one.
                self.close_term();
                self.phase = Phase::Term(TermBlock::default());
                self.stats.terms += 1;
            },
            Event::TermEnd => self.close_term(),
            Event::QualifierStart => self.qualifier_depth += 1,
            Event::QualifierEnd => self.qualifier_depth = self.qualifier_depth.saturating_sub(1),
            Event::LinkStart { href } => self.open_link(href),
            Event::LinkEnd => self.close_link(sink),
            Event::Text(text) => self.text(text),
        }
    }

    /// Closes whatever is still open and returns the final counters.
    pub(crate) fn finish(&mut self) -> ParseStats {
        self.close_term();
        self.stats
    }

    fn in_qualifier(&self) -> bool {
        self.qualifier_depth > 0
    }

    fn open_link(&mut self, href: Option<&str>) {
        let Phase::Term(block) = &mut self.phase else {
            self.stats.ignored_links += 1;
            return;
        };
        if block.link.is_some() {
            block.nested += 1;
            self.stats.ignored_links += 1;
            return;
        }
        let Some(href) = href.filter(|href| !href.is_empty()) else {
            self.stats.ignored_links += 1;
            return;
        };
        block.link_count += 1;
        block.link = Some(OpenLink {
            url: resolve(self.base, href),
            text: String::new(),
        });
    }

    fn close_link<S: EntrySink + ?Sized>(&mut self, sink: &mut S) {
        let in_qualifier = self.in_qualifier();
        let Phase::Term(block) = &mut self.phase else {
            return;
        };
        if block.nested > 0 {
            block.nested -= 1;
            return;
        }
        let Some(link) = block.link.take() else {
            return;
        };
        if block.link_count == 1 {
            let raw = collapse_whitespace(&link.text);
            if in_qualifier {
                self.description = raw;
            } else {
                // e.g. "__and__() (in module operator)"
                self.description = QUALIFIER_REGEX.find(&raw).map(|m| m.as_str().to_string()).unwrap_or_default();
                self.term = QUALIFIER_REGEX.replace_all(&raw, "").into_owned();
            }
            self.description = PARENTHESES_REGEX.replace_all(&self.description, "").into_owned();
        }
        let book = Book::classify(&link.url, block.link_count);
        sink.accept(Entry::new(self.term.clone(), self.description.clone(), book, link.url));
        self.stats.entries += 1;
    }

    fn text(&mut self, text: &str) {
        let in_qualifier = self.in_qualifier();
        let Phase::Term(block) = &mut self.phase else {
            return;
        };
        match &mut block.link {
            Some(link) => link.text.push_str(text),
            None if !in_qualifier => block.label.push_str(text),
            None => {},
        }
    }

    fn close_term(&mut self) {
        let Phase::Term(block) = std::mem::take(&mut self.phase) else {
            return;
        };
        // A bare "<dt>abs()</dt>" names the term for the qualifier blocks nested below it.
        if block.link_count == 0 && !self.in_qualifier() {
            let label = collapse_whitespace(&block.label);
            if !label.is_empty() {
                self.term = label;
                self.description.clear();
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
