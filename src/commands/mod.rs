//! The `gitc` command.
//!
//! Merges `.gitc.yaml` with the command-line flags, optionally probes the
//! remote, asks for confirmation, runs the cleanup, and reports the result.

mod display;

pub use display::{render_plan, render_result};

use crate::cleanup::{
    CleanupOptions, CleanupPlan, CleanupResult, confirm_repository, execute_cleanup, plan_cleanup,
};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{ErrorKind, GitcError, Result, user_error};
use crate::exit_codes;
use crate::git::{GitCli, GitRunner};
use crate::repository::check_remote_access;
use dialoguer::Confirm;
use serde::Serialize;
use tracing::{debug, info};

/// JSON document printed with `--json`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    result: &'a CleanupResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a CleanupPlan>,
}

/// Run gitc in the process working directory and return the exit code.
pub fn run(cli: Cli) -> Result<i32> {
    run_with(&GitCli::new(), &cli, prompt_confirmation)
}

/// Run gitc against `git`, asking `confirm` before anything is changed.
///
/// `confirm` is only consulted outside dry-run and without `--yes`; returning
/// `false` ends the run successfully with nothing changed.
pub fn run_with<F>(git: &dyn GitRunner, cli: &Cli, confirm: F) -> Result<i32>
where
    F: FnOnce(&CleanupPlan) -> Result<bool>,
{
    // `dry_run` and `force` only come from flags; check them before reading
    // any config.
    build_options(cli, &Config::default()).validate()?;

    let workdir = git.workdir()?;
    let config = Config::discover(cli.config.as_deref(), &workdir)?;
    let options = build_options(cli, &config);

    if cli.check_remote || config.check_remote {
        confirm_repository(git)?;
        debug!(timeout = ?config.remote_timeout(), "checking remote access");
        check_remote_access(git, config.remote_timeout())?;
    }

    if !options.dry_run && !options.skip_confirmation {
        // With --json, stdout carries only the report.
        let plan = plan_cleanup(git, &options)?;
        if cli.json {
            eprint!("{}", render_plan(&plan));
        } else {
            print!("{}", render_plan(&plan));
        }
        if !confirm(&plan)? {
            info!("cleanup declined");
            if cli.json {
                eprintln!("Cleanup cancelled. Nothing was changed.");
            } else {
                println!("Cleanup cancelled. Nothing was changed.");
            }
            return Ok(exit_codes::SUCCESS);
        }
    }

    let result = execute_cleanup(git, &options)?;

    // Dry runs stop before deleting, so show what a real run would delete.
    let plan = if options.dry_run {
        Some(plan_cleanup(git, &options)?)
    } else {
        None
    };

    if cli.json {
        let report = Report {
            result: &result,
            plan: plan.as_ref(),
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| GitcError::new("report", ErrorKind::Io(e.into())))?;
        println!("{}", text);
    } else {
        print!("{}", render_result(&result));
        if let Some(plan) = &plan {
            println!();
            print!("{}", render_plan(plan));
        }
    }

    if result.has_errors() {
        Ok(exit_codes::PARTIAL_FAILURE)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Combine flags and config into cleanup options. Flags win.
pub fn build_options(cli: &Cli, config: &Config) -> CleanupOptions {
    CleanupOptions {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
        skip_confirmation: cli.yes,
        force: cli.force,
        default_branch: cli
            .default_branch
            .clone()
            .or_else(|| config.default_branch.clone()),
        exclude_pattern: cli.exclude.clone().or_else(|| config.exclude.clone()),
        skip_pull: cli.no_pull || config.no_pull,
        rebase: cli.rebase || config.rebase,
    }
}

fn prompt_confirmation(_plan: &CleanupPlan) -> Result<bool> {
    Confirm::new()
        .with_prompt("Proceed with cleanup?")
        .default(false)
        .interact()
        .map_err(|e| {
            user_error(
                "confirm",
                format!("cannot ask for confirmation ({}); rerun with --yes", e),
            )
        })
}
