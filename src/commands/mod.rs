//! Command implementations.

mod cache;
mod lookup;
mod update;

pub use self::cache::cache;
pub use self::lookup::lookup;
pub use self::update::update;

use std::path::{Path, PathBuf};

use exn::ResultExt;
use pylookup_cache::{Database, Query, Repository, Store};
use pylookup_config::Config;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use crate::source::Source;

/// Run every mode requested on the command line: update, then cache, then lookup.
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref(), &cli.overrides()).or_raise(|| ErrorKind::Config)?;
    let database = prepare_database(&config.database, cli.update.is_some())?;

    let db = Database::connect(&database).await.or_raise(|| ErrorKind::Cache)?;
    let store = Repository::from(&db);
    let result = run_modes(&cli, &config, &store, &database).await;
    store.close().await;
    result
}

async fn run_modes(cli: &Cli, config: &Config, store: &dyn Store, database: &Path) -> Result<()> {
    if let Some(input) = &cli.update {
        let source = Source::parse(input, &config.index_file)?;
        let count = update(store, &source, config).await?;
        info!(count, "stored entries");
    }
    if cli.cache {
        cache(store, &mut std::io::stdout().lock()).await?;
    }
    if let Some(terms) = &cli.lookup {
        let query = Query::parse(terms).with_case(config.case_sensitive);
        let root = database.parent().unwrap_or(Path::new("/"));
        lookup(store, &query, root, &mut std::io::stdout().lock()).await?;
    }
    Ok(())
}

/// Absolute store location. Updates create missing parent directories,
/// reading modes require an existing store.
fn prepare_database(path: &Path, create: bool) -> Result<PathBuf> {
    let path = std::path::absolute(path).or_raise(|| ErrorKind::Io)?;
    if create {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
    } else if !path.is_file() {
        exn::bail!(ErrorKind::NotFound(path));
    }
    debug!(path = %path.display(), "using entry store");
    Ok(path)
}
