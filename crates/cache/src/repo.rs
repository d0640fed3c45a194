//! SQLite-backed [`Store`].

use async_trait::async_trait;
use exn::ResultExt;
use futures::StreamExt;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::record::Record;
use crate::store::{EntryStream, Store};

/// Repository for index entries in the store database.
///
/// Rebuilding runs in a single transaction: readers keep seeing the previous
/// index until the new one is committed, and a failed rebuild leaves the
/// previous index in place.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

#[async_trait]
impl Store for Repository {
    async fn put(&self, key: &str, record: &Record) -> Result<()> {
        sqlx::query(include_str!("../queries/upsert_entry.sql"))
            .bind(key)
            .bind(record.to_string())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar(include_str!("../queries/get_value.sql"))
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(include_str!("../queries/list_keys.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/delete_entry.sql"))
            .bind(key)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip_all)]
    async fn rebuild(&self, mut entries: EntryStream<'_>) -> Result<u64> {
        let mut count = 0u64;
        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/clear_entries.sql"))
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        while let Some(entry) = entries.next().await {
            let entry = entry?;
            let key = entry.key();
            sqlx::query(include_str!("../queries/upsert_entry.sql"))
                .bind(&key)
                .bind(Record::from(entry).to_string())
                .execute(&mut *tx)
                .await
                .or_raise(|| ErrorKind::Database)?;
            count += 1;
        }
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        debug!(count, "rebuilt entry store");
        Ok(count)
    }

    async fn close(&self) {
        _ = sqlx::query("PRAGMA optimize").execute(&self.pool).await;
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::OptionExt;
    use futures::stream;
    use pylookup_extract::{Book, Entry, Shelf};

    async fn repository() -> Repository {
        let db = Database::connect_in_memory().await.unwrap();
        Repository::from(&db)
    }

    async fn count(repo: &Repository) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM entries").fetch_one(&repo.pool).await.unwrap()
    }

    fn stream_of(entries: Vec<Result<Entry>>) -> EntryStream<'static> {
        Box::pin(stream::iter(entries))
    }

    fn entry(term: &str, description: &str, occurrence: u32, url: &str) -> Entry {
        Entry::new(term, description, Book::new(Shelf::Library, occurrence), url)
    }

    fn record(url: &str) -> Record {
        Record {
            description: "built-in function".to_string(),
            book: Book::new(Shelf::Library, 1),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let repo = repository().await;
        repo.put("abs", &record("library/functions.html#abs")).await.unwrap();
        assert_eq!(
            repo.get("abs").await.unwrap().as_deref(),
            Some("built-in function;lib;library/functions.html#abs")
        );
        // Keys are case-sensitive
        assert_eq!(repo.get("ABS").await.unwrap(), None);
        assert!(repo.delete("abs").await.unwrap());
        assert!(!repo.delete("abs").await.unwrap());
        assert_eq!(repo.get("abs").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let repo = repository().await;
        repo.put("abs", &record("old.html")).await.unwrap();
        repo.put("abs", &record("new.html")).await.unwrap();
        let raw = repo.get("abs").await.unwrap().unwrap();
        assert_eq!(raw.parse::<Record>().unwrap().url, "new.html");
        assert_eq!(count(&repo).await, 1);
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let repo = repository().await;
        for key in ["floor", "abs", "absolute"] {
            repo.put(key, &record("x.html")).await.unwrap();
        }
        assert_eq!(repo.keys().await.unwrap(), vec!["abs", "absolute", "floor"]);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_everything() {
        let repo = repository().await;
        repo.put("stale", &record("stale.html")).await.unwrap();
        let entries = vec![
            entry("abs() ", "built-in function", 1, "library/functions.html#abs"),
            entry("abs() ", "built-in function", 2, "reference/datamodel.html#object.__abs__"),
        ];
        let count = repo.rebuild(stream_of(entries.into_iter().map(Ok).collect())).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            repo.keys().await.unwrap(),
            vec!["abs()\t(built-in function)\t[lib/2]", "abs()\t(built-in function)\t[lib]"]
        );
        assert_eq!(repo.get("stale").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rebuild_with_nothing_empties_store() {
        let repo = repository().await;
        repo.put("stale", &record("stale.html")).await.unwrap();
        let count = repo.rebuild(stream_of(Vec::new())).await.unwrap();
        assert_eq!(count, 0);
        assert!(repo.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interrupted_rebuild_keeps_previous_index() {
        let repo = repository().await;
        repo.put("abs", &record("library/functions.html#abs")).await.unwrap();
        let entries = vec![
            Ok(entry("floor() ", "in module math", 1, "library/math.html#math.floor")),
            None.ok_or_raise(|| ErrorKind::Interrupted),
        ];
        let err = repo.rebuild(stream_of(entries)).await.unwrap_err();
        assert!(matches!(*err, ErrorKind::Interrupted));
        assert_eq!(repo.keys().await.unwrap(), vec!["abs"]);
    }
}
