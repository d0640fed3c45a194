//! Substring lookups over stored keys.

use std::collections::BTreeSet;

use pylookup_extract::CaseSensitivity;
use tracing::{debug, instrument};

use crate::consts::QUALIFIER_REGEX;
use crate::error::Result;
use crate::store::Store;

/// Search terms for a lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
    case: CaseSensitivity,
}
impl Query {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            case: CaseSensitivity::default(),
        }
    }

    /// Split whitespace-separated input into terms.
    pub fn parse(input: &str) -> Self {
        Self::new(input.split_whitespace())
    }

    pub fn with_case(mut self, case: impl Into<CaseSensitivity>) -> Self {
        self.case = case.into();
        self
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn case(&self) -> CaseSensitivity {
        self.case
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Keys containing any of the query's terms, sorted.
///
/// A key is selected once for every term it contains, so a key matching two
/// terms appears twice.
pub fn select<'k, I>(keys: I, query: &Query) -> Vec<&'k str>
where
    I: IntoIterator<Item = &'k str>,
    I::IntoIter: Clone,
{
    let keys = keys.into_iter();
    let mut selected = Vec::new();
    for term in query.terms() {
        match query.case() {
            CaseSensitivity::Sensitive => selected.extend(keys.clone().filter(|key| key.contains(term.as_str()))),
            CaseSensitivity::Insensitive => {
                let term = term.to_lowercase();
                selected.extend(keys.clone().filter(|key| key.to_lowercase().contains(&term)));
            },
        }
    }
    selected.sort_unstable();
    selected
}

/// Matching `(key, raw value)` pairs from the store, sorted by key then value.
///
/// No match is an empty result. Keys removed between listing and fetching are
/// skipped.
#[instrument(skip(store))]
pub async fn lookup(store: &dyn Store, query: &Query) -> Result<Vec<(String, String)>> {
    let keys = store.keys().await?;
    let mut results = Vec::new();
    for key in select(keys.iter().map(String::as_str), query) {
        if let Some(value) = store.get(key).await? {
            results.push((key.to_string(), value));
        }
    }
    results.sort();
    debug!(matches = results.len(), "lookup complete");
    Ok(results)
}

/// Deduplicated base terms: every `(...)` and `[...]` segment removed, the
/// remainder trimmed, empty results dropped.
pub fn cache_keys<'k>(keys: impl IntoIterator<Item = &'k str>) -> BTreeSet<String> {
    keys.into_iter()
        .map(|key| QUALIFIER_REGEX.replace_all(key, "").trim().to_string())
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const KEYS: [&str; 3] = ["abs", "absolute", "floor"];

    #[test]
    fn test_select_substring() {
        let query = Query::parse("abs");
        assert_eq!(select(KEYS, &query), vec!["abs", "absolute"]);
    }

    #[rstest]
    #[case(false, vec!["abs", "absolute"])]
    #[case(true, vec![])]
    fn test_select_case(#[case] case_sensitive: bool, #[case] expected: Vec<&str>) {
        let query = Query::parse("ABS").with_case(case_sensitive);
        assert_eq!(select(KEYS, &query), expected);
    }

    #[test]
    fn test_select_duplicates_per_term() {
        let query = Query::parse("abs  lute");
        assert_eq!(select(KEYS, &query), vec!["abs", "absolute", "absolute"]);
    }

    #[test]
    fn test_select_literal() {
        let keys = ["a.b()", "axb"];
        assert_eq!(select(keys, &Query::parse("a.b")), vec!["a.b()"]);
        assert_eq!(select(keys, &Query::parse("b()")), vec!["a.b()"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("nothing")]
    fn test_select_nothing(#[case] input: &str) {
        assert!(select(KEYS, &Query::parse(input)).is_empty());
    }

    #[test]
    fn test_parse() {
        let query = Query::parse("  abs\tfloor\n");
        assert_eq!(query.terms(), ["abs", "floor"]);
        assert_eq!(query.case(), CaseSensitivity::Insensitive);
        assert!(Query::parse(" ").is_empty());
    }

    #[test]
    fn test_cache_keys() {
        let expected: BTreeSet<String> = ["abs", "floor"].into_iter().map(String::from).collect();
        assert_eq!(cache_keys(["abs()", "floor() [math]"]), expected);
    }

    #[rstest]
    #[case("abs()\t(built-in function)\t[lib]", "abs")]
    #[case("__and__()\t(in module operator)\t[lib/2]", "__and__")]
    #[case("PyObject\t()\t[api]", "PyObject")]
    #[case("with\t(statement)\t[ref]", "with")]
    fn test_cache_keys_stored_form(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(cache_keys([key]).into_iter().collect::<Vec<_>>(), vec![expected]);
    }

    #[test]
    fn test_cache_keys_drops_empty_and_dedupes() {
        let keys = ["(only qualifier)", "[etc]", "abs() [lib]", "abs() [lib/2]"];
        assert_eq!(cache_keys(keys).into_iter().collect::<Vec<_>>(), vec!["abs"]);
    }

    mod with_store {
        use super::*;
        use crate::{Database, Record, Repository, Store};
        use pylookup_extract::{Book, Shelf};

        async fn store() -> Repository {
            Repository::from(&Database::connect_in_memory().await.unwrap())
        }

        fn record(url: &str) -> Record {
            Record {
                description: String::new(),
                book: Book::new(Shelf::Library, 1),
                url: url.to_string(),
            }
        }

        #[tokio::test]
        async fn test_lookup() {
            let store = store().await;
            for key in KEYS {
                store.put(key, &record(&format!("{key}.html"))).await.unwrap();
            }
            let results = lookup(&store, &Query::parse("abs")).await.unwrap();
            assert_eq!(
                results,
                vec![
                    ("abs".to_string(), ";lib;abs.html".to_string()),
                    ("absolute".to_string(), ";lib;absolute.html".to_string()),
                ]
            );
        }

        #[tokio::test]
        async fn test_lookup_empty_store() {
            let store = store().await;
            assert!(lookup(&store, &Query::parse("abs")).await.unwrap().is_empty());
        }
    }
}
