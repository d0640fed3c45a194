//! Logging initialization.

use tracing::Level;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Log level selected by the verbosity flags.
pub fn level(cli: &Cli) -> Level {
    if cli.verbose || cli.debug {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install the global subscriber. Logs go to stderr so stdout only carries results.
pub fn initialize(cli: &Cli) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[rstest]
    #[case(&["pylookup", "-c"], Level::WARN)]
    #[case(&["pylookup", "-c", "-v"], Level::DEBUG)]
    #[case(&["pylookup", "-c", "--debug"], Level::DEBUG)]
    #[case(&["pylookup", "-c", "-q"], Level::ERROR)]
    fn test_level(#[case] args: &[&str], #[case] expected: Level) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(level(&cli), expected);
    }
}
