//! Error types for gitc.
//!
//! Every failure is a [`GitcError`]: an [`ErrorKind`] plus the name of the
//! operation that failed and optional path/message context. Callers that add
//! context wrap the inner error instead of replacing it, so the root kind stays
//! inspectable through [`GitcError::root_kind`].

use crate::exit_codes;
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Error, Debug)]
pub enum ErrorKind {
    /// Mutually exclusive or malformed options.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Unreadable or invalid configuration file.
    #[error("{0}")]
    Config(String),

    #[error("not a git repository")]
    NotARepository,

    #[error("could not detect default branch")]
    NoDefaultBranch,

    #[error("failed to access remote repository")]
    RemoteAccessFailed,

    #[error("merge conflict detected")]
    MergeConflict,

    #[error("branch not found")]
    BranchNotFound,

    #[error("cannot delete current branch")]
    CannotDeleteCurrentBranch,

    /// git ran but exited non-zero.
    #[error("git {command} failed (exit code {code}): {detail}")]
    CommandFailed {
        command: String,
        code: i32,
        detail: String,
    },

    /// git could not be started or waited on.
    #[error("failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("git {command} timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// An inner error that a caller decorated with its own context.
    #[error(transparent)]
    Wrapped(Box<GitcError>),
}

/// Main error type for gitc operations.
#[derive(Debug)]
pub struct GitcError {
    op: String,
    path: Option<String>,
    message: Option<String>,
    kind: ErrorKind,
}

impl GitcError {
    pub fn new(op: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            op: op.into(),
            path: None,
            message: None,
            kind,
        }
    }

    /// Wrap an existing error under a new operation name.
    pub fn wrap(op: impl Into<String>, inner: GitcError) -> Self {
        Self::new(op, ErrorKind::Wrapped(Box::new(inner)))
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The innermost kind, looking through any number of wraps.
    pub fn root_kind(&self) -> &ErrorKind {
        let mut current = self;
        while let ErrorKind::Wrapped(inner) = &current.kind {
            current = inner;
        }
        &current.kind
    }

    pub fn is_not_a_repository(&self) -> bool {
        matches!(self.root_kind(), ErrorKind::NotARepository)
    }

    pub fn is_no_default_branch(&self) -> bool {
        matches!(self.root_kind(), ErrorKind::NoDefaultBranch)
    }

    pub fn is_remote_access_failed(&self) -> bool {
        matches!(self.root_kind(), ErrorKind::RemoteAccessFailed)
    }

    pub fn is_merge_conflict(&self) -> bool {
        matches!(self.root_kind(), ErrorKind::MergeConflict)
    }

    pub fn is_branch_not_found(&self) -> bool {
        matches!(self.root_kind(), ErrorKind::BranchNotFound)
    }

    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.root_kind() {
            ErrorKind::InvalidOptions(_)
            | ErrorKind::Config(_)
            | ErrorKind::NotARepository
            | ErrorKind::NoDefaultBranch
            | ErrorKind::BranchNotFound
            | ErrorKind::CannotDeleteCurrentBranch => exit_codes::USER_ERROR,
            _ => exit_codes::GIT_FAILURE,
        }
    }
}

impl fmt::Display for GitcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.op)?;
        if let Some(path) = &self.path {
            write!(f, " {}", path)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for GitcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Wrapped(inner) => Some(inner.as_ref()),
            ErrorKind::Spawn { source, .. } => Some(source),
            ErrorKind::Io(source) => Some(source),
            _ => None,
        }
    }
}

/// Shorthand for a user error that has no underlying git failure.
pub fn user_error(op: &str, message: impl Into<String>) -> GitcError {
    GitcError::new(op, ErrorKind::InvalidOptions(message.into()))
}

/// Result type alias for gitc operations.
pub type Result<T> = std::result::Result<T, GitcError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_includes_op_and_kind() {
        let err = GitcError::new("fetch", ErrorKind::RemoteAccessFailed);
        assert_eq!(err.to_string(), "git fetch: failed to access remote repository");
    }

    #[test]
    fn display_includes_path_and_message() {
        let err = GitcError::new("cleanup", ErrorKind::NotARepository).with_path("/tmp/x");
        assert_eq!(err.to_string(), "git cleanup /tmp/x: not a git repository");

        let err = GitcError::new("pull", ErrorKind::MergeConflict)
            .with_message("conflict during rebase");
        assert_eq!(
            err.to_string(),
            "git pull: conflict during rebase: merge conflict detected"
        );
    }

    #[test]
    fn wrapped_errors_keep_root_kind() {
        let inner = GitcError::new("pull", ErrorKind::MergeConflict);
        let outer = GitcError::wrap("cleanup", inner).with_message("pull failed");

        assert!(outer.is_merge_conflict());
        assert_eq!(outer.message(), Some("pull failed"));
        assert!(matches!(outer.kind(), ErrorKind::Wrapped(_)));
        assert_eq!(
            outer.to_string(),
            "git cleanup: pull failed: git pull: merge conflict detected"
        );
        assert!(outer.source().is_some());
    }

    #[test]
    fn root_kind_walks_multiple_wraps() {
        let err = GitcError::wrap(
            "cleanup",
            GitcError::wrap(
                "detect-default-branch",
                GitcError::new("detect-default-branch", ErrorKind::NoDefaultBranch),
            ),
        );
        assert!(err.is_no_default_branch());
        assert!(!err.is_not_a_repository());
    }

    #[test]
    fn predicates_match_only_their_kind() {
        assert!(GitcError::new("x", ErrorKind::NotARepository).is_not_a_repository());
        assert!(GitcError::new("x", ErrorKind::RemoteAccessFailed).is_remote_access_failed());
        assert!(GitcError::new("x", ErrorKind::BranchNotFound).is_branch_not_found());
        assert!(!GitcError::new("x", ErrorKind::BranchNotFound).is_merge_conflict());
    }

    #[test]
    fn exit_codes_follow_root_kind() {
        let err = user_error("options", "bad");
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = GitcError::wrap("cleanup", GitcError::new("x", ErrorKind::BranchNotFound));
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = GitcError::new(
            "checkout",
            ErrorKind::CommandFailed {
                command: "checkout".to_string(),
                code: 1,
                detail: "error".to_string(),
            },
        );
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
    }

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let kind = ErrorKind::Timeout {
            command: "ls-remote".to_string(),
            after: Duration::from_millis(200),
        };
        assert_eq!(kind.to_string(), "git ls-remote timed out after 200ms");
    }

    #[test]
    fn command_failed_message_is_descriptive() {
        let kind = ErrorKind::CommandFailed {
            command: "branch".to_string(),
            code: 1,
            detail: "error: branch 'x' not found.".to_string(),
        };
        assert_eq!(
            kind.to_string(),
            "git branch failed (exit code 1): error: branch 'x' not found."
        );
    }
}
