//! Command-line arguments.

use clap::{ArgGroup, Parser};
use pylookup_config::Overrides;
use std::path::PathBuf;

/// Look up terms in the Python documentation index.
///
/// Modes can be combined, and run in the order update, cache, lookup.
#[derive(Debug, Clone, Parser)]
#[command(name = "pylookup", version, about)]
#[command(group(ArgGroup::new("mode").required(true).multiple(true).args(["update", "cache", "lookup"])))]
pub struct Cli {
    /// Location of the entry store.
    #[arg(short = 'd', long = "db", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Rebuild the store from a documentation directory, index file or URL.
    #[arg(short, long, value_name = "SOURCE")]
    pub update: Option<String>,

    /// Print every known base term, one per line.
    #[arg(short, long)]
    pub cache: bool,

    /// Print `key;url` for every entry containing one of the whitespace-separated terms.
    #[arg(short, long, value_name = "TERMS")]
    pub lookup: Option<String>,

    /// Match lookup terms case-sensitively.
    #[arg(long)]
    pub case_sensitive: bool,

    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(long, hide = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            database: self.database.clone(),
            case_sensitive: self.case_sensitive.then_some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind as ClapErrorKind;

    #[test]
    fn test_command() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mode_required() {
        let err = Cli::try_parse_from(["pylookup", "-d", "x.db"]).unwrap_err();
        assert_eq!(err.kind(), ClapErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_modes_combine() {
        let cli = Cli::try_parse_from(["pylookup", "-u", "docs", "-c", "-l", "abs floor"]).unwrap();
        assert_eq!(cli.update.as_deref(), Some("docs"));
        assert!(cli.cache);
        assert_eq!(cli.lookup.as_deref(), Some("abs floor"));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from(["pylookup", "-c"]).unwrap();
        assert_eq!(cli.overrides(), Overrides::default());

        let cli = Cli::try_parse_from(["pylookup", "--db", "x.db", "--case-sensitive", "-l", "abs"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.database, Some(PathBuf::from("x.db")));
        assert_eq!(overrides.case_sensitive, Some(true));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pylookup", "-c", "-q", "-v"]).is_err());
    }
}
