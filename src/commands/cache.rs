use std::io::Write;

use exn::ResultExt;
use pylookup_cache::{Store, cache_keys};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Print every distinct base term in the store, one per line.
#[instrument(skip_all)]
pub async fn cache(store: &dyn Store, out: &mut impl Write) -> Result<usize> {
    let keys = store.keys().await.or_raise(|| ErrorKind::Cache)?;
    let terms = cache_keys(keys.iter().map(String::as_str));
    for term in &terms {
        writeln!(out, "{term}").or_raise(|| ErrorKind::Io)?;
    }
    Ok(terms.len())
}
