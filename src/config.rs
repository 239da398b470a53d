//! Configuration file for gitc.
//!
//! This module defines the Config struct that represents `.gitc.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for every field, and validation of config values.
//! Command-line flags always take precedence over values read here.

use crate::error::{ErrorKind, GitcError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = ".gitc.yaml";

/// Persistent defaults for cleanup runs.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Branch to treat as default instead of detecting one.
    pub default_branch: Option<String>,

    /// Branch name that is never deleted.
    pub exclude: Option<String>,

    /// Skip `git pull` after switching to the default branch.
    pub no_pull: bool,

    /// Pull with `--rebase`.
    pub rebase: bool,

    /// Probe the remote before cleaning up.
    pub check_remote: bool,

    /// Seconds to wait for the remote probe.
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
}

fn default_remote_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_branch: None,
            exclude: None,
            no_pull: false,
            rebase: false,
            check_remote: false,
            remote_timeout_secs: default_remote_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            config_error(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the config for a run.
    ///
    /// An explicit path must exist. Otherwise `.gitc.yaml` in `dir` is used if
    /// present, and defaults if not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| config_error(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| config_error(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `remote_timeout_secs` must be positive
    /// - `default_branch` and `exclude` must not be blank when present
    pub fn validate(&self) -> Result<()> {
        if self.remote_timeout_secs == 0 {
            return Err(config_error(
                "config validation failed: remote_timeout_secs must be greater than 0",
            ));
        }

        for (field, value) in [
            ("default_branch", &self.default_branch),
            ("exclude", &self.exclude),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(config_error(format!(
                    "config validation failed: {} must not be empty",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Timeout for the remote access probe.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }
}

fn config_error(message: impl Into<String>) -> GitcError {
    GitcError::new("load-config", ErrorKind::Config(message.into()))
}
