//! Data types for the cleanup sequence.

use crate::error::{GitcError, Result, user_error};
use serde::{Serialize, Serializer};

/// Options controlling one cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Report what would happen without switching, pulling, or deleting.
    /// The remote is still fetched.
    pub dry_run: bool,
    /// Emit step-by-step logs.
    pub verbose: bool,
    /// Do not ask before deleting.
    pub skip_confirmation: bool,
    /// Delete branches even if they are not fully merged (`branch -D`).
    pub force: bool,
    /// Use this branch as the default instead of detecting one.
    pub default_branch: Option<String>,
    /// Never delete the branch with exactly this name.
    pub exclude_pattern: Option<String>,
    /// Skip `git pull` after switching to the default branch.
    pub skip_pull: bool,
    /// Pull with `--rebase`.
    pub rebase: bool,
}

impl CleanupOptions {
    /// Check option combinations that cannot be honored together.
    pub fn validate(&self) -> Result<()> {
        if self.dry_run && self.force {
            return Err(user_error(
                "validate-options",
                "--dry-run and --force cannot be used together",
            ));
        }
        Ok(())
    }

    /// The requested default branch, if one was given and is non-empty.
    pub fn explicit_default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref().filter(|b| !b.is_empty())
    }

    /// The exclude pattern, if one was given and is non-empty.
    pub fn exclude(&self) -> Option<&str> {
        self.exclude_pattern.as_deref().filter(|p| !p.is_empty())
    }
}

/// What a cleanup run did.
#[derive(Debug, Default, Serialize)]
pub struct CleanupResult {
    /// The branch treated as default.
    pub default_branch: String,
    /// Branches deleted, in listing order.
    pub deleted_branches: Vec<String>,
    /// Branches kept (default, excluded, or failed to delete), in listing order.
    pub skipped_branches: Vec<String>,
    /// Failures that did not stop the run.
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<GitcError>,
    /// Whether this was a dry run.
    pub was_dry_run: bool,
}

impl CleanupResult {
    /// Returns true if any step was recorded as failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn serialize_errors<S: Serializer>(
    errors: &[GitcError],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Why a branch is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepReason {
    DefaultBranch,
    Excluded,
}

/// What the cleanup does with one local branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "reason")]
pub enum BranchDecision {
    Delete,
    Keep(KeepReason),
}

/// A read-only preview of a cleanup run.
#[derive(Debug, Default, Serialize)]
pub struct CleanupPlan {
    /// The branch that would be treated as default.
    pub default_branch: String,
    /// The branch currently checked out.
    pub current_branch: String,
    /// Every local branch with its decision, in listing order.
    pub branches: Vec<(String, BranchDecision)>,
}

impl CleanupPlan {
    /// Branches that would be deleted.
    pub fn to_delete(&self) -> impl Iterator<Item = &str> {
        self.branches
            .iter()
            .filter(|(_, d)| *d == BranchDecision::Delete)
            .map(|(b, _)| b.as_str())
    }

    /// Branches that would be kept, with the reason.
    pub fn to_keep(&self) -> impl Iterator<Item = (&str, KeepReason)> {
        self.branches.iter().filter_map(|(b, d)| match d {
            BranchDecision::Keep(reason) => Some((b.as_str(), *reason)),
            BranchDecision::Delete => None,
        })
    }

    /// Whether the run would switch branches first.
    pub fn needs_switch(&self) -> bool {
        self.current_branch != self.default_branch
    }
}
