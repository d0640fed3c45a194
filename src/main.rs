//! pylookup: look up terms in the Python documentation index.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod error;
mod logging;
mod source;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::initialize(&cli) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}
