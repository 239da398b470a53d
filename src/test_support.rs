use crate::error::{ErrorKind, GitcError, Result};
use crate::git::{CommandOutcome, GitRunner};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A scratch repository, plus the bare repository acting as its `origin`.
pub(crate) struct TestRepo {
    dir: TempDir,
    remote: Option<TempDir>,
}

impl TestRepo {
    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn remote_path(&self) -> Option<&Path> {
        self.remote.as_ref().map(|r| r.path())
    }
}

/// Repository with one commit on `main` and no remote.
pub(crate) fn create_test_repo() -> TestRepo {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    git(path, &["init"]);
    // Ensure the repo uses a deterministic default branch name across environments.
    // This sets HEAD to an unborn `main` branch before the first commit.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    TestRepo { dir, remote: None }
}

/// Repository whose `main` tracks `origin/main` in a bare repository, with
/// `refs/remotes/origin/HEAD` pointing at it.
pub(crate) fn create_test_repo_with_remote() -> TestRepo {
    let mut repo = create_test_repo();
    let remote = TempDir::new().unwrap();

    git(remote.path(), &["init", "--bare"]);
    git(remote.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let remote_str = remote.path().to_string_lossy().to_string();
    git(repo.path(), &["remote", "add", "origin", &remote_str]);
    git(repo.path(), &["push", "-u", "origin", "main"]);
    git(repo.path(), &["remote", "set-head", "origin", "--auto"]);

    repo.remote = Some(remote);
    repo
}

/// Write `name` and commit it on the current branch.
pub(crate) fn commit_file(repo_dir: &Path, name: &str, contents: &str) {
    std::fs::write(repo_dir.join(name), contents).unwrap();
    git(repo_dir, &["add", name]);
    git(repo_dir, &["commit", "-m", &format!("Add {}", name)]);
}

/// Run git in `repo_dir`, panicking on failure, and return trimmed stdout.
pub(crate) fn git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

enum Scripted {
    Outcome(CommandOutcome),
    Timeout,
}

/// In-memory [`GitRunner`] that replays canned outcomes and records calls.
///
/// Commands are keyed by their arguments joined with single spaces. A
/// command with no scripted response fails with exit code 1.
pub(crate) struct ScriptedGit {
    _dir: TempDir,
    workdir: PathBuf,
    responses: HashMap<String, Scripted>,
    calls: RefCell<Vec<String>>,
    workdir_requested: Cell<bool>,
}

impl ScriptedGit {
    /// Runner whose working directory looks like a repository.
    pub(crate) fn new() -> Self {
        let runner = Self::outside_repo();
        std::fs::create_dir(runner.workdir.join(".git")).unwrap();
        runner
    }

    /// Runner whose working directory is a plain directory.
    pub(crate) fn outside_repo() -> Self {
        let dir = TempDir::new().unwrap();
        let workdir = dir.path().to_path_buf();
        Self {
            _dir: dir,
            workdir,
            responses: HashMap::new(),
            calls: RefCell::new(Vec::new()),
            workdir_requested: Cell::new(false),
        }
    }

    pub(crate) fn on(mut self, command: &str, outcome: CommandOutcome) -> Self {
        self.responses
            .insert(command.to_string(), Scripted::Outcome(outcome));
        self
    }

    pub(crate) fn timeout_on(mut self, command: &str) -> Self {
        self.responses.insert(command.to_string(), Scripted::Timeout);
        self
    }

    /// Every command run so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn was_called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }

    pub(crate) fn workdir_requested(&self) -> bool {
        self.workdir_requested.get()
    }

    fn respond(&self, args: &[&str], timeout: Option<Duration>) -> Result<CommandOutcome> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());
        match self.responses.get(&key) {
            Some(Scripted::Outcome(outcome)) => Ok(outcome.clone()),
            Some(Scripted::Timeout) => Err(GitcError::new(
                args.first().copied().unwrap_or(""),
                ErrorKind::Timeout {
                    command: args.first().copied().unwrap_or("").to_string(),
                    after: timeout.unwrap_or_default(),
                },
            )),
            None => Ok(CommandOutcome::failed(
                1,
                format!("unscripted git command: {}", key),
            )),
        }
    }
}

impl GitRunner for ScriptedGit {
    fn workdir(&self) -> Result<PathBuf> {
        self.workdir_requested.set(true);
        Ok(self.workdir.clone())
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutcome> {
        self.respond(args, None)
    }

    fn run_with_timeout(&self, args: &[&str], timeout: Duration) -> Result<CommandOutcome> {
        self.respond(args, Some(timeout))
    }
}
