//! Remote synchronization: fetch, pull, and access checks.

use crate::error::{ErrorKind, GitcError, Result};
use crate::git::GitRunner;
use std::time::Duration;
use tracing::debug;

/// Remote consulted for HEAD detection and access checks.
pub const DEFAULT_REMOTE: &str = "origin";

/// Update all remote-tracking refs and prune the stale ones.
pub fn fetch(git: &dyn GitRunner) -> Result<()> {
    let args = ["fetch", "--all", "--prune"];
    git.run(&args)
        .and_then(|o| o.into_result("fetch", &args))
        .map_err(|e| GitcError::wrap("fetch", e))?;
    Ok(())
}

/// Pull the current branch.
///
/// A failure whose output mentions "conflict" is reported as
/// [`ErrorKind::MergeConflict`].
pub fn pull(git: &dyn GitRunner) -> Result<()> {
    let args = ["pull"];
    let outcome = git.run(&args).map_err(|e| GitcError::wrap("pull", e))?;
    if outcome.success {
        return Ok(());
    }
    if outcome.mentions("conflict") {
        return Err(GitcError::new("pull", ErrorKind::MergeConflict));
    }
    Err(GitcError::wrap("pull", outcome.into_error("pull", &args)))
}

/// Pull the current branch with `--rebase`, classifying conflicts like [`pull`].
pub fn pull_with_rebase(git: &dyn GitRunner) -> Result<()> {
    let args = ["pull", "--rebase"];
    let outcome = git.run(&args).map_err(|e| GitcError::wrap("pull", e))?;
    if outcome.success {
        return Ok(());
    }
    if outcome.mentions("conflict") {
        return Err(GitcError::new("pull", ErrorKind::MergeConflict)
            .with_message("conflict during rebase"));
    }
    Err(GitcError::wrap("pull", outcome.into_error("pull", &args)).with_message("rebase failed"))
}

/// Verify that the default remote is reachable.
///
/// Probes `ls-remote --heads` under `timeout`. If the probe succeeds but lists
/// nothing, the remote may simply be empty, so the remote's URL is checked
/// instead.
pub fn check_remote_access(git: &dyn GitRunner, timeout: Duration) -> Result<()> {
    let probe = git.run_with_timeout(&["ls-remote", "--heads", DEFAULT_REMOTE], timeout);

    let outcome = match probe {
        Ok(outcome) if outcome.success => outcome,
        Ok(outcome) => {
            let detail = if outcome.stderr.is_empty() {
                format!("exit code {}", outcome.exit_code.unwrap_or(-1))
            } else {
                outcome.stderr
            };
            return Err(remote_access_failed(format!(
                "failed to access remote: {}",
                detail
            )));
        }
        Err(e) => {
            return Err(remote_access_failed(format!(
                "failed to access remote: {}",
                e
            )));
        }
    };

    if outcome.is_empty() {
        debug!(remote = DEFAULT_REMOTE, "remote lists no heads; checking its URL");
        let url = git
            .run(&["remote", "get-url", DEFAULT_REMOTE])
            .ok()
            .filter(|o| o.success)
            .ok_or_else(|| {
                remote_access_failed(format!("no remote '{}' configured", DEFAULT_REMOTE))
            })?;
        if url.is_empty() {
            return Err(remote_access_failed(format!(
                "remote '{}' has no URL",
                DEFAULT_REMOTE
            )));
        }
    }

    Ok(())
}

/// Check whether a remote named `name` is configured.
pub fn has_remote(git: &dyn GitRunner, name: &str) -> Result<bool> {
    let args = ["remote"];
    let outcome = git
        .run(&args)
        .and_then(|o| o.into_result("check-remote", &args))
        .map_err(|e| GitcError::wrap("check-remote", e))?;
    Ok(outcome.lines().contains(&name))
}

/// URL configured for the remote `name`.
pub fn remote_url(git: &dyn GitRunner, name: &str) -> Result<String> {
    let args = ["remote", "get-url", name];
    let outcome = git
        .run(&args)
        .and_then(|o| o.into_result("get-remote-url", &args))
        .map_err(|e| GitcError::wrap("get-remote-url", e).with_path(name))?;
    Ok(outcome.stdout)
}

fn remote_access_failed(message: String) -> GitcError {
    GitcError::new("check-remote", ErrorKind::RemoteAccessFailed).with_message(message)
}
