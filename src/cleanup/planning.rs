//! Cleanup planning: repository checks, default branch resolution, and the
//! per-branch keep/delete rule shared by the preview and the real run.

use super::types::{BranchDecision, CleanupOptions, CleanupPlan, KeepReason};
use crate::error::{ErrorKind, GitcError, Result};
use crate::git::GitRunner;
use crate::repository::{
    branch_exists, current_branch, detect_default_branch, is_repository, list_local_branches,
};
use std::path::PathBuf;
use tracing::debug;

/// Resolve the working directory and make sure it is a repository.
pub fn confirm_repository(git: &dyn GitRunner) -> Result<PathBuf> {
    let cwd = git.workdir().map_err(|e| GitcError::wrap("cleanup", e))?;
    debug!(path = %cwd.display(), "checking repository");

    is_repository(&cwd).map_err(|_| {
        GitcError::new("cleanup", ErrorKind::NotARepository).with_path(cwd.display().to_string())
    })?;
    Ok(cwd)
}

/// The branch to treat as default: the explicit one if given (it must exist),
/// otherwise the detected one.
pub fn resolve_default_branch(git: &dyn GitRunner, options: &CleanupOptions) -> Result<String> {
    match options.explicit_default_branch() {
        Some(requested) => {
            let exists = branch_exists(git, requested).map_err(|e| {
                GitcError::wrap("resolve-default-branch", e).with_path(requested)
            })?;
            if !exists {
                return Err(
                    GitcError::new("resolve-default-branch", ErrorKind::BranchNotFound)
                        .with_message(format!("default branch '{}' does not exist", requested)),
                );
            }
            debug!(branch = requested, "using requested default branch");
            Ok(requested.to_string())
        }
        None => {
            let detected =
                detect_default_branch(git).map_err(|e| GitcError::wrap("cleanup", e))?;
            debug!(branch = %detected, "detected default branch");
            Ok(detected)
        }
    }
}

/// Decide what happens to `branch`.
///
/// The default branch and a branch named exactly like the exclude pattern are
/// kept; everything else is a deletion candidate.
pub fn classify_branch(
    branch: &str,
    default_branch: &str,
    exclude: Option<&str>,
) -> BranchDecision {
    if branch == default_branch {
        BranchDecision::Keep(KeepReason::DefaultBranch)
    } else if exclude == Some(branch) {
        BranchDecision::Keep(KeepReason::Excluded)
    } else {
        BranchDecision::Delete
    }
}

/// Preview a cleanup without changing anything.
///
/// Performs the same validation, repository check, and default branch
/// resolution as a real run, then classifies the current local branches.
/// Nothing is fetched, so branches pruned by the fetch still show up here.
pub fn plan_cleanup(git: &dyn GitRunner, options: &CleanupOptions) -> Result<CleanupPlan> {
    options.validate()?;
    confirm_repository(git)?;

    let default_branch = resolve_default_branch(git, options)?;
    let current_branch = current_branch(git).map_err(|e| GitcError::wrap("plan", e))?;
    let branches = list_local_branches(git)
        .map_err(|e| GitcError::wrap("plan", e))?
        .into_iter()
        .map(|branch| {
            let decision = classify_branch(&branch, &default_branch, options.exclude());
            (branch, decision)
        })
        .collect();

    Ok(CleanupPlan {
        default_branch,
        current_branch,
        branches,
    })
}
