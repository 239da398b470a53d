//! CLI argument parsing for gitc.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module only describes the flags; the run itself lives in the
//! `commands` module.

use clap::Parser;
use std::path::PathBuf;

/// gitc: return a repository to its default branch and delete stale branches.
///
/// Switches to the default branch, fetches with pruning, pulls, and deletes
/// every other local branch except the one given with `--exclude`.
#[derive(Parser, Debug)]
#[command(name = "gitc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show what would happen without switching, pulling, or deleting.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print debug logging to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Delete branches even if they are not fully merged (`git branch -D`).
    #[arg(short, long)]
    pub force: bool,

    /// Use this branch as the default instead of detecting it.
    #[arg(short = 'b', long, value_name = "NAME")]
    pub default_branch: Option<String>,

    /// Never delete the branch with exactly this name.
    #[arg(short, long, value_name = "NAME")]
    pub exclude: Option<String>,

    /// Skip `git pull` after switching.
    #[arg(long)]
    pub no_pull: bool,

    /// Pull with `--rebase`.
    #[arg(long)]
    pub rebase: bool,

    /// Check that the remote is reachable before doing anything.
    #[arg(long)]
    pub check_remote: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Read settings from this file instead of `.gitc.yaml`.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
