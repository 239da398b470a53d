//! gitc: return a repository to its default branch and delete stale branches.
//!
//! This is the main entry point for the `gitc` CLI. It parses arguments,
//! sets up logging, runs the cleanup, and maps errors to exit codes.

mod cli;
mod commands;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod repository;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match commands::run(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Logs go to stderr so stdout stays parseable with `--json`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
