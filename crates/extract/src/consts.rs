use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// A parenthesized qualifier with at least one character inside, e.g. "(in module operator)".
// Empty call parentheses such as "abs()" deliberately don't match.
regex!(QUALIFIER_REGEX, r"\([^)]+\)");
regex!(PARENTHESES_REGEX, r"[()]");

pub(crate) const TERM_TAG: &str = "dt";
pub(crate) const QUALIFIER_TAG: &str = "dd";
pub(crate) const LINK_TAG: &str = "a";
pub(crate) const HREF_ATTRIBUTE: &str = "href";
