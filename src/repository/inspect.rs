//! Read-only repository queries.

use crate::error::{ErrorKind, GitcError, Result};
use crate::git::GitRunner;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that `path` is the root of a git repository.
///
/// The repository metadata directory (`.git`) must exist and be a directory.
/// A `.git` file (as found in linked worktrees) is rejected.
pub fn is_repository(path: &Path) -> Result<()> {
    let git_dir = path.join(".git");
    match std::fs::metadata(&git_dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(GitcError::new("is-repository", ErrorKind::NotARepository)
            .with_path(git_dir.display().to_string())
            .with_message(".git exists but is not a directory")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(GitcError::new("is-repository", ErrorKind::NotARepository)
                .with_path(path.display().to_string()))
        }
        Err(e) => Err(GitcError::new("is-repository", ErrorKind::Io(e))
            .with_path(git_dir.display().to_string())
            .with_message("failed to check git directory")),
    }
}

/// The process working directory.
pub fn current_directory() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        GitcError::new("current-directory", ErrorKind::Io(e))
            .with_message("failed to get current directory")
    })
}

/// Name of the checked-out branch (`HEAD` when detached).
pub fn current_branch(git: &dyn GitRunner) -> Result<String> {
    let args = ["rev-parse", "--abbrev-ref", "HEAD"];
    let outcome = git
        .run(&args)
        .and_then(|o| o.into_result("get-current-branch", &args))
        .map_err(|e| GitcError::wrap("get-current-branch", e))?;

    if outcome.is_empty() {
        return Err(GitcError::new(
            "get-current-branch",
            ErrorKind::CommandFailed {
                command: "rev-parse".to_string(),
                code: 0,
                detail: "no output from git command".to_string(),
            },
        ));
    }

    Ok(outcome.stdout)
}

/// Local branch names in git's listing order.
pub fn list_local_branches(git: &dyn GitRunner) -> Result<Vec<String>> {
    list_branches(git, "list-local-branches", &["branch", "--format=%(refname:short)"])
}

/// Remote-tracking branch names, qualified by remote (e.g. `origin/main`).
pub fn list_remote_branches(git: &dyn GitRunner) -> Result<Vec<String>> {
    list_branches(
        git,
        "list-remote-branches",
        &["branch", "-r", "--format=%(refname:short)"],
    )
}

fn list_branches(git: &dyn GitRunner, op: &str, args: &[&str]) -> Result<Vec<String>> {
    let outcome = git
        .run(args)
        .and_then(|o| o.into_result(op, args))
        .map_err(|e| GitcError::wrap(op, e))?;
    Ok(outcome.lines().into_iter().map(str::to_string).collect())
}

/// Check whether `name` exists locally or on any remote.
///
/// A failure to list remote branches is treated as "not found on a remote";
/// a failure to list local branches is returned as an error.
pub fn branch_exists(git: &dyn GitRunner, name: &str) -> Result<bool> {
    let local = list_local_branches(git)?;
    if local.iter().any(|b| b == name) {
        return Ok(true);
    }

    let suffix = format!("/{}", name);
    match list_remote_branches(git) {
        Ok(remote) => Ok(remote.iter().any(|b| b.ends_with(&suffix))),
        Err(e) => {
            debug!(branch = name, error = %e, "remote branch listing failed; assuming absent");
            Ok(false)
        }
    }
}
