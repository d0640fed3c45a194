//! Joining index links onto the directory the index was loaded from.

/// Resolves `href` against `base` with path-join semantics.
///
/// - Absolute links (a `scheme://` prefix, or a leading `/`) are kept as-is.
/// - An empty base leaves the link untouched.
/// - Otherwise the link is appended with exactly one `/` separator.
pub(crate) fn resolve(base: &str, href: &str) -> String {
    if base.is_empty() || href.starts_with('/') || has_scheme(href) {
        return href.to_string();
    }
    match base.ends_with('/') {
        true => format!("{base}{href}"),
        false => format!("{base}/{href}"),
    }
}

fn has_scheme(href: &str) -> bool {
    href.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
