//! Branch operations (switch, delete).

use crate::error::{ErrorKind, GitcError, Result};
use crate::git::GitRunner;
use tracing::info;

/// Check out `branch`.
pub fn checkout_branch(git: &dyn GitRunner, branch: &str) -> Result<()> {
    let args = ["checkout", branch];
    git.run(&args)
        .and_then(|o| o.into_result("checkout", &args))
        .map_err(|e| GitcError::wrap("checkout", e).with_path(branch))?;
    info!(branch, "switched branch");
    Ok(())
}

/// Delete a local branch.
///
/// Uses `git branch -d <branch>` (safe delete, requires fully merged), or
/// `-D` when `force` is set.
///
/// git refuses to delete a branch that is checked out in any worktree; that
/// refusal is reported as [`ErrorKind::CannotDeleteCurrentBranch`].
pub fn delete_branch(git: &dyn GitRunner, branch: &str, force: bool) -> Result<()> {
    let delete_flag = if force { "-D" } else { "-d" };
    let args = ["branch", delete_flag, branch];

    let outcome = git
        .run(&args)
        .map_err(|e| GitcError::wrap("delete-branch", e).with_path(branch))?;

    if !outcome.success {
        let stderr = outcome.stderr.to_lowercase();
        if stderr.contains("cannot delete branch")
            && (stderr.contains("checked out") || stderr.contains("used by worktree"))
        {
            return Err(
                GitcError::new("delete-branch", ErrorKind::CannotDeleteCurrentBranch)
                    .with_path(branch),
            );
        }
        return Err(
            GitcError::wrap("delete-branch", outcome.into_error("branch", &args)).with_path(branch),
        );
    }

    info!(branch, force, "deleted branch");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{CommandOutcome, GitCli};
    use crate::repository::{current_branch, list_local_branches};
    use crate::test_support::{ScriptedGit, commit_file, create_test_repo, git};

    #[test]
    fn test_checkout_branch() {
        let temp_dir = create_test_repo();
        git(temp_dir.path(), &["branch", "feature"]);
        let runner = GitCli::in_dir(temp_dir.path());

        checkout_branch(&runner, "feature").unwrap();
        assert_eq!(current_branch(&runner).unwrap(), "feature");
    }

    #[test]
    fn test_checkout_missing_branch_fails_with_path() {
        let temp_dir = create_test_repo();
        let runner = GitCli::in_dir(temp_dir.path());

        let err = checkout_branch(&runner, "nope").unwrap_err();
        assert_eq!(err.op(), "checkout");
        assert_eq!(err.path(), Some("nope"));
    }

    #[test]
    fn test_delete_merged_branch() {
        let temp_dir = create_test_repo();
        git(temp_dir.path(), &["branch", "deletable"]);
        let runner = GitCli::in_dir(temp_dir.path());

        delete_branch(&runner, "deletable", false).unwrap();
        assert_eq!(list_local_branches(&runner).unwrap(), vec!["main"]);
    }

    #[test]
    fn test_delete_unmerged_branch_requires_force() {
        let temp_dir = create_test_repo();
        git(temp_dir.path(), &["checkout", "-b", "unmerged"]);
        commit_file(temp_dir.path(), "unmerged.txt", "work in progress\n");
        git(temp_dir.path(), &["checkout", "main"]);
        let runner = GitCli::in_dir(temp_dir.path());

        let err = delete_branch(&runner, "unmerged", false).unwrap_err();
        assert!(err.to_string().contains("not fully merged"));

        delete_branch(&runner, "unmerged", true).unwrap();
        assert_eq!(list_local_branches(&runner).unwrap(), vec!["main"]);
    }

    #[test]
    fn test_delete_current_branch_is_classified() {
        let temp_dir = create_test_repo();
        git(temp_dir.path(), &["branch", "other"]);
        let runner = GitCli::in_dir(temp_dir.path());

        let err = delete_branch(&runner, "main", true).unwrap_err();
        assert!(matches!(
            err.root_kind(),
            ErrorKind::CannotDeleteCurrentBranch
        ));
        assert_eq!(err.path(), Some("main"));
    }

    #[test]
    fn test_delete_uses_force_flag() {
        let runner = ScriptedGit::new().on("branch -D stale", CommandOutcome::ok("Deleted branch stale"));
        delete_branch(&runner, "stale", true).unwrap();
        assert!(runner.was_called("branch -D stale"));
        assert!(!runner.was_called("branch -d stale"));
    }
}
