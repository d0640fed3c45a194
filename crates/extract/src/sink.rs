use crate::models::Entry;

/// Consumer of entries as the parser discovers them.
///
/// Entries are handed over one at a time, in document order, as soon as each
/// link closes. Implemented for every `FnMut(Entry)` closure, so collecting
/// into a `Vec`, writing to a store, or forwarding over a channel are all
/// one-liners:
///
/// ```rust
/// use pylookup_extract::IndexParser;
///
/// let html = r#"<dl><dt><a href="library/functions.html#abs">abs() (built-in function)</a></dt></dl>"#;
/// let mut terms = Vec::new();
/// IndexParser::new("docs").parse(html, |entry: pylookup_extract::Entry| terms.push(entry.term));
/// assert_eq!(terms, vec!["abs() ".to_string()]);
/// ```
pub trait EntrySink {
    fn accept(&mut self, entry: Entry);
}
impl<F: FnMut(Entry)> EntrySink for F {
    fn accept(&mut self, entry: Entry) {
        self(entry)
    }
}
