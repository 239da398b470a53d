//! Default branch detection.

use super::inspect::{list_local_branches, list_remote_branches};
use crate::error::{ErrorKind, GitcError, Result};
use crate::git::GitRunner;
use tracing::debug;

/// Branch names treated as the default, highest priority first.
pub const COMMON_DEFAULT_BRANCHES: [&str; 4] = ["main", "master", "develop", "dev"];

/// Detect the repository's default branch.
///
/// Resolution order, first match wins:
///
/// 1. The remote's symbolic HEAD (`refs/remotes/origin/HEAD`)
/// 2. A local branch from [`COMMON_DEFAULT_BRANCHES`], in priority order
/// 3. A remote branch ending in `/<name>` for the same names
///
/// Failing to list remote branches in step 3 is not an error; detection
/// simply falls through to [`ErrorKind::NoDefaultBranch`].
pub fn detect_default_branch(git: &dyn GitRunner) -> Result<String> {
    if let Some(branch) = remote_head_branch(git) {
        debug!(branch = %branch, "default branch from remote HEAD");
        return Ok(branch);
    }

    let local = list_local_branches(git).map_err(|e| {
        GitcError::wrap("detect-default-branch", e).with_message("failed to list branches")
    })?;
    for candidate in COMMON_DEFAULT_BRANCHES {
        if local.iter().any(|b| b == candidate) {
            debug!(branch = candidate, "default branch from local branch names");
            return Ok(candidate.to_string());
        }
    }

    match list_remote_branches(git) {
        Ok(remote) => {
            for candidate in COMMON_DEFAULT_BRANCHES {
                let suffix = format!("/{}", candidate);
                if remote.iter().any(|b| b.ends_with(&suffix)) {
                    debug!(branch = candidate, "default branch from remote branch names");
                    return Ok(candidate.to_string());
                }
            }
        }
        Err(e) => debug!(error = %e, "ignoring remote branch listing failure"),
    }

    Err(GitcError::new(
        "detect-default-branch",
        ErrorKind::NoDefaultBranch,
    ))
}

/// Last path segment of `refs/remotes/origin/HEAD`, if it resolves.
fn remote_head_branch(git: &dyn GitRunner) -> Option<String> {
    let outcome = git
        .run(&["symbolic-ref", "refs/remotes/origin/HEAD"])
        .ok()?;
    if !outcome.success || outcome.is_empty() {
        return None;
    }
    outcome
        .stdout
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
