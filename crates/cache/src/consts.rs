use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Any parenthesized or bracketed segment, including empty call parentheses.
regex!(QUALIFIER_REGEX, r"\([^)]*\)|\[[^\]]*\]");
