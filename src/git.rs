//! Git command runner for gitc.
//!
//! Provides a safe wrapper around git commands with captured stdout/stderr.
//! All git operations go through the [`GitRunner`] trait so the cleanup logic
//! can be driven against a real `git` binary or a scripted stand-in.

use crate::error::{ErrorKind, GitcError, Result};
use crate::repository::current_directory;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};

/// Result of a git command, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
    /// Whether git exited with status 0.
    pub success: bool,
    /// Exit code, absent if the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            success: output.status.success(),
            exit_code: output.status.code(),
        }
    }

    /// Build a successful outcome with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into().trim().to_string(),
            stderr: String::new(),
            success: true,
            exit_code: Some(0),
        }
    }

    /// Build a failed outcome with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into().trim().to_string(),
            success: false,
            exit_code: Some(exit_code),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns stdout lines with blank lines removed.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Returns true if stdout or stderr mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.stderr.contains(needle) || self.stdout.contains(needle)
    }

    /// Convert a failed outcome into a `CommandFailed` error.
    pub fn into_result(self, op: &str, args: &[&str]) -> Result<CommandOutcome> {
        if self.success {
            Ok(self)
        } else {
            Err(self.into_error(op, args))
        }
    }

    /// Build the `CommandFailed` error describing this outcome.
    ///
    /// The error detail is stderr, falling back to stdout when git wrote
    /// nothing to stderr.
    pub fn into_error(self, op: &str, args: &[&str]) -> GitcError {
        let detail = if self.stderr.is_empty() {
            self.stdout
        } else {
            self.stderr
        };
        GitcError::new(
            op,
            ErrorKind::CommandFailed {
                command: command_name(args).to_string(),
                code: self.exit_code.unwrap_or(-1),
                detail,
            },
        )
    }
}

/// Something that can run git commands.
pub trait GitRunner {
    /// Directory the commands operate on.
    fn workdir(&self) -> Result<PathBuf>;

    /// Run git to completion.
    ///
    /// A non-zero exit is reported as an unsuccessful [`CommandOutcome`], not
    /// an error. Errors mean git could not be run at all.
    fn run(&self, args: &[&str]) -> Result<CommandOutcome>;

    /// Run git, giving up after `timeout`.
    ///
    /// On expiry the call fails with [`ErrorKind::Timeout`]. Cancellation is
    /// best-effort: the process is left to finish and is reaped in the
    /// background.
    fn run_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<CommandOutcome>;
}

/// [`GitRunner`] backed by the `git` binary on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    cwd: Option<PathBuf>,
}

impl GitCli {
    /// Runner that uses the process working directory.
    pub fn new() -> Self {
        Self { cwd: None }
    }

    /// Runner pinned to `cwd`.
    pub fn in_dir<P: AsRef<Path>>(cwd: P) -> Self {
        Self {
            cwd: Some(cwd.as_ref().to_path_buf()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new("git");
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl GitRunner for GitCli {
    fn workdir(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => current_directory(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutcome> {
        trace!(args = ?args, "running git");
        let output = self
            .command(args)
            .output()
            .map_err(|e| spawn_error(args, e))?;
        let outcome = CommandOutcome::from_output(&output);
        debug!(
            command = command_name(args),
            success = outcome.success,
            exit_code = ?outcome.exit_code,
            "git finished"
        );
        Ok(outcome)
    }

    fn run_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<CommandOutcome> {
        trace!(args = ?args, timeout = ?timeout, "running git with timeout");
        let mut command = self.command(args);
        command.env("GIT_TERMINAL_PROMPT", "0");
        let child = command.spawn().map_err(|e| spawn_error(args, e))?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The receiver is gone after a timeout; nothing left to report to.
            let _ = tx.send(child.wait_with_output());
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(output)) => Ok(CommandOutcome::from_output(&output)),
            Ok(Err(e)) => Err(spawn_error(args, e)),
            Err(RecvTimeoutError::Timeout) => {
                debug!(command = command_name(args), "git timed out");
                Err(GitcError::new(
                    command_name(args),
                    ErrorKind::Timeout {
                        command: command_name(args).to_string(),
                        after: timeout,
                    },
                ))
            }
            Err(RecvTimeoutError::Disconnected) => Err(spawn_error(
                args,
                std::io::Error::other("git worker exited without a result"),
            )),
        }
    }
}

/// The git subcommand in `args`, skipping global options such as `-c k=v`.
fn command_name<'a>(args: &[&'a str]) -> &'a str {
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        match arg {
            "-c" | "-C" => {
                iter.next();
            }
            _ if arg.starts_with('-') => {}
            _ => return arg,
        }
    }
    args.first().copied().unwrap_or("")
}

fn spawn_error(args: &[&str], source: std::io::Error) -> GitcError {
    GitcError::new(
        command_name(args),
        ErrorKind::Spawn {
            command: command_name(args).to_string(),
            source,
        },
    )
}
