//! Repository queries and mutations for gitc.
//!
//! This module provides the git operations the cleanup sequence is built from:
//!
//! - Inspecting the repository (current branch, branch listings, existence)
//! - Detecting the default branch
//! - Synchronizing with the remote (fetch, pull, access probe)
//! - Switching to and deleting branches
//!
//! Every function takes a [`GitRunner`](crate::git::GitRunner) and never
//! touches the process state itself.

mod branch;
mod detect;
mod inspect;
mod remote;

// Re-export public API
pub use branch::{checkout_branch, delete_branch};
pub use detect::{COMMON_DEFAULT_BRANCHES, detect_default_branch};
pub use inspect::{
    branch_exists, current_branch, current_directory, is_repository, list_local_branches,
    list_remote_branches,
};
pub use remote::{
    DEFAULT_REMOTE, check_remote_access, fetch, has_remote, pull, pull_with_rebase, remote_url,
};
