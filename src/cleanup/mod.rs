//! The cleanup sequence.
//!
//! Switches to the default branch, synchronizes with the remote, and deletes
//! local branches that are no longer needed:
//!
//! 1. Validate options
//! 2. Confirm the working directory is a repository
//! 3. Resolve the default branch (explicit or detected)
//! 4. Switch to it (simulated in dry-run)
//! 5. Fetch all remotes with pruning (always, even in dry-run)
//! 6. Stop here in dry-run
//! 7. Pull, unless disabled
//! 8. List local branches
//! 9. Delete every branch that is neither the default nor excluded
//!
//! # Failure handling
//!
//! Steps 1-4 and 8 are fatal: the error is returned and no result is
//! produced. Fetch, pull, and individual deletions are recorded in
//! [`CleanupResult::errors`] and the run continues, so a caller must check both
//! the returned result and its error list.

mod planning;
mod types;


pub use planning::{classify_branch, confirm_repository, plan_cleanup, resolve_default_branch};
pub use types::{BranchDecision, CleanupOptions, CleanupPlan, CleanupResult, KeepReason};

use crate::error::{GitcError, Result};
use crate::git::GitRunner;
use crate::repository::{
    checkout_branch, current_branch, delete_branch, fetch, list_local_branches, pull,
    pull_with_rebase,
};
use tracing::{debug, info, warn};

/// Run the cleanup sequence.
pub fn execute_cleanup(git: &dyn GitRunner, options: &CleanupOptions) -> Result<CleanupResult> {
    options.validate()?;

    debug!(
        dry_run = options.dry_run,
        verbose = options.verbose,
        yes = options.skip_confirmation,
        force = options.force,
        skip_pull = options.skip_pull,
        "starting cleanup"
    );

    confirm_repository(git)?;

    let default_branch = resolve_default_branch(git, options)?;
    let mut result = CleanupResult {
        default_branch: default_branch.clone(),
        was_dry_run: options.dry_run,
        ..Default::default()
    };

    switch_to_default(git, &default_branch, options.dry_run)?;

    debug!("fetching (git fetch --all --prune)");
    match fetch(git) {
        Ok(()) => debug!("fetch complete"),
        Err(e) => {
            warn!(error = %e, "fetch failed; continuing");
            result
                .errors
                .push(GitcError::wrap("cleanup", e).with_message("fetch failed"));
        }
    }

    if options.dry_run {
        debug!("dry run: skipping pull and deletions");
        return Ok(result);
    }

    if options.skip_pull {
        debug!("pull skipped");
    } else {
        let pulled = if options.rebase {
            pull_with_rebase(git)
        } else {
            pull(git)
        };
        match pulled {
            Ok(()) => debug!("pull complete"),
            Err(e) => {
                warn!(error = %e, "pull failed; continuing");
                result
                    .errors
                    .push(GitcError::wrap("cleanup", e).with_message("pull failed"));
            }
        }
    }

    let branches = list_local_branches(git).map_err(|e| GitcError::wrap("cleanup", e))?;
    debug!(branches = ?branches, "local branches");

    for branch in branches {
        match classify_branch(&branch, &default_branch, options.exclude()) {
            BranchDecision::Keep(reason) => {
                debug!(branch = %branch, reason = ?reason, "keeping branch");
                result.skipped_branches.push(branch);
            }
            BranchDecision::Delete => match delete_branch(git, &branch, options.force) {
                Ok(()) => result.deleted_branches.push(branch),
                Err(e) => {
                    warn!(branch = %branch, error = %e, "could not delete branch");
                    result
                        .errors
                        .push(GitcError::wrap("cleanup", e).with_path(branch.clone()));
                    result.skipped_branches.push(branch);
                }
            },
        }
    }

    info!(
        deleted = result.deleted_branches.len(),
        skipped = result.skipped_branches.len(),
        errors = result.errors.len(),
        "cleanup finished"
    );

    Ok(result)
}

fn switch_to_default(git: &dyn GitRunner, default_branch: &str, dry_run: bool) -> Result<()> {
    let current = current_branch(git).map_err(|e| GitcError::wrap("cleanup", e))?;
    debug!(current = %current, "current branch");

    if current == default_branch {
        debug!("already on the default branch");
    } else if dry_run {
        debug!(from = %current, to = default_branch, "dry run: would switch branch");
    } else {
        checkout_branch(git, default_branch).map_err(|e| {
            GitcError::wrap("cleanup", e).with_message("failed to switch to default branch")
        })?;
    }
    Ok(())
}
