//! Exit code constants for the gitc CLI.
//!
//! - 0: Success
//! - 1: User error (bad options, not a repository, unknown default branch)
//! - 2: Partial failure (cleanup finished but some steps were recorded as errors)
//! - 3: Git operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or a repository state the user must fix.
pub const USER_ERROR: i32 = 1;

/// Cleanup ran to completion but fetch, pull, or some deletions failed.
pub const PARTIAL_FAILURE: i32 = 2;

/// Git operation failure: checkout, listing, or an unexpected git error.
pub const GIT_FAILURE: i32 = 3;
