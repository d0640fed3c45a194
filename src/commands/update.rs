use async_stream::stream;
use exn::ResultExt;
use pylookup_cache::error::{ErrorKind as CacheErrorKind, Result as CacheResult};
use pylookup_cache::{EntryStream, Store};
use pylookup_config::Config;
use pylookup_extract::{Entry, IndexParser, ParseStats};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::error::{ErrorKind, Result};
use crate::source::Source;

/// Replace the contents of `store` with the entries of the index at `source`.
///
/// The parser runs on the blocking pool and hands entries over a bounded
/// channel, so the store is written while the page is still being parsed.
/// If the parser fails, the store keeps its previous contents.
#[instrument(skip_all, fields(source = %source))]
pub async fn update(store: &dyn Store, source: &Source, config: &Config) -> Result<u64> {
    info!("fetching index");
    let html = source.load(config).await?;
    let base = source.base();

    let (tx, rx) = mpsc::channel::<Entry>(config.channel_capacity);
    let parser = tokio::task::spawn_blocking(move || {
        IndexParser::new(base).parse_bytes(&html, |entry: Entry| {
            // A closed channel means the store gave up; the error surfaces from rebuild.
            _ = tx.blocking_send(entry);
        })
    });

    let count = match store.rebuild(forward(rx, parser)).await {
        Ok(count) => count,
        Err(err) => {
            let kind = match *err {
                CacheErrorKind::Interrupted => ErrorKind::Index,
                _ => ErrorKind::Cache,
            };
            return Err(err).or_raise(|| kind);
        },
    };
    info!(count, "index updated");
    Ok(count)
}

/// Entries received from the parser, followed by an error item if the parser
/// did not run to completion.
fn forward(mut rx: mpsc::Receiver<Entry>, parser: JoinHandle<ParseStats>) -> EntryStream<'static> {
    Box::pin(stream! {
        while let Some(entry) = rx.recv().await {
            let entry: CacheResult<Entry> = Ok(entry);
            yield entry;
        }
        match parser.await {
            Ok(stats) => debug!(terms = stats.terms, ignored_links = stats.ignored_links, "index parsed"),
            Err(e) => {
                let failed: CacheResult<Entry> = Err(e).or_raise(|| CacheErrorKind::Interrupted);
                yield failed;
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pylookup_cache::{MemoryStore, Record};
    use pylookup_extract::{Book, Shelf};

    const INDEX: &str = r#"<html><body>
<dl>
  <dt><a href="library/functions.html#abs">abs() (built-in function)</a>, <a href="reference/datamodel.html#object.__abs__">[1]</a></dt>
  <dt>__and__()</dt>
  <dd><dl>
    <dt><a href="library/operator.html#operator.__and__">(in module operator)</a></dt>
  </dl></dd>
  <dt><a href="glossary.html#term-floor-division">floor division</a></dt>
</dl>
</body></html>"#;

    #[tokio::test]
    async fn test_update_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("genindex-all.html"), INDEX).unwrap();
        let config = Config::default();
        let source = Source::parse(dir.path().to_str().unwrap(), &config.index_file).unwrap();
        let store = MemoryStore::with_entries([("stale", ";etc;old.html")]);

        let count = update(&store, &source, &config).await.unwrap();
        assert_eq!(count, store.len().await as u64);
        assert_eq!(store.get("stale").await.unwrap(), None);

        let raw = store.get("abs()\t(built-in function)\t[lib]").await.unwrap().unwrap();
        let record: Record = raw.parse().unwrap();
        assert_eq!(record.url, format!("{}/library/functions.html#abs", dir.path().display()));

        let raw = store.get("abs()\t(built-in function)\t[ref/2]").await.unwrap().unwrap();
        assert!(raw.ends_with("/reference/datamodel.html#object.__abs__"));
    }

    #[tokio::test]
    async fn test_update_missing_index_keeps_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let source = Source::parse(dir.path().to_str().unwrap(), &config.index_file).unwrap();
        let store = MemoryStore::with_entries([("abs", ";lib;x.html")]);

        let err = update(&store, &source, &config).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_small_channel() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("genindex-all.html"), INDEX).unwrap();
        let config = Config { channel_capacity: 1, ..Config::default() };
        let source = Source::parse(dir.path().to_str().unwrap(), &config.index_file).unwrap();
        let store = MemoryStore::new();
        assert_eq!(update(&store, &source, &config).await.unwrap(), store.len().await as u64);
    }

    #[tokio::test]
    async fn test_parser_failure_keeps_store() {
        let store = MemoryStore::with_entries([("abs", ";lib;x.html")]);
        let (tx, rx) = mpsc::channel(4);
        let parser = tokio::task::spawn_blocking(move || -> ParseStats {
            let entry = Entry::new("floor() ", "", Book::new(Shelf::Library, 1), "library/math.html#math.floor");
            tx.blocking_send(entry).unwrap();
            panic!("tokenizer stopped");
        });
        let err = store.rebuild(forward(rx, parser)).await.unwrap_err();
        assert!(matches!(*err, CacheErrorKind::Interrupted));
        assert_eq!(store.keys().await.unwrap(), vec!["abs"]);
    }

    #[tokio::test]
    async fn test_forward_ends_after_parser() {
        let (tx, rx) = mpsc::channel(4);
        let parser = tokio::task::spawn_blocking(move || {
            IndexParser::new("docs").parse(INDEX, |entry: Entry| {
                tx.blocking_send(entry).unwrap();
            })
        });
        let store = MemoryStore::new();
        assert_eq!(store.rebuild(forward(rx, parser)).await.unwrap(), 4);
    }
}
