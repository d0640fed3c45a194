use std::io::Write;
use std::path::Path;

use exn::ResultExt;
use pylookup_cache::{Query, Record, Store};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Print `key;url` for every entry matching `query`, sorted by key.
///
/// Stored URLs that aren't web links are printed as `file://` URLs, with
/// relative paths taken from `root`.
#[instrument(skip(store, out))]
pub async fn lookup(store: &dyn Store, query: &Query, root: &Path, out: &mut impl Write) -> Result<usize> {
    let matches = pylookup_cache::lookup(store, query).await.or_raise(|| ErrorKind::Cache)?;
    for (key, raw) in &matches {
        let record: Record = raw.parse::<Record>().or_raise(|| ErrorKind::Cache)?;
        writeln!(out, "{key};{}", link(&record.url, root)).or_raise(|| ErrorKind::Io)?;
    }
    Ok(matches.len())
}

fn link(url: &str, root: &Path) -> String {
    if url.starts_with("http") {
        return url.to_string();
    }
    let path = url.strip_prefix("file://").unwrap_or(url);
    format!("file://{}", root.join(path).display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pylookup_cache::MemoryStore;
    use rstest::rstest;

    #[rstest]
    #[case("https://docs.python.org/3/library/functions.html#abs", "https://docs.python.org/3/library/functions.html#abs")]
    #[case("/usr/share/doc/python/library/functions.html#abs", "file:///usr/share/doc/python/library/functions.html#abs")]
    #[case("docs/library/functions.html#abs", "file:///var/lib/pylookup/docs/library/functions.html#abs")]
    #[case("file:///opt/docs/glossary.html", "file:///opt/docs/glossary.html")]
    fn test_link(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(link(url, Path::new("/var/lib/pylookup")), expected);
    }

    #[tokio::test]
    async fn test_lookup_output() {
        let store = MemoryStore::with_entries([
            ("floor\t()\t[etc]", ";etc;/docs/glossary.html#floor"),
            ("absolute\t()\t[etc]", ";etc;https://example.org/absolute"),
            ("abs()\t(built-in function)\t[lib]", "built-in function;lib;/docs/library/functions.html#abs"),
        ]);
        let mut out = Vec::new();
        let count = lookup(&store, &Query::parse("ABS"), Path::new("/"), &mut out).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "abs()\t(built-in function)\t[lib];file:///docs/library/functions.html#abs\n\
             absolute\t()\t[etc];https://example.org/absolute\n"
        );
    }

    #[tokio::test]
    async fn test_lookup_no_match() {
        let store = MemoryStore::with_entries([("floor\t()\t[etc]", ";etc;glossary.html")]);
        let mut out = Vec::new();
        assert_eq!(lookup(&store, &Query::parse("abs"), Path::new("/"), &mut out).await.unwrap(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_corrupt_record() {
        let store = MemoryStore::with_entries([("abs", "not a record")]);
        let err = lookup(&store, &Query::parse("abs"), Path::new("/"), &mut Vec::new()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Cache));
    }
}
