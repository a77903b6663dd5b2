//! Execution context - the read-only inputs of one bootstrap run

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Well-known keys of the context parameter bag
pub mod keys {
    pub const COMPOSE_FILE: &str = "compose_file";
    pub const APP_URL: &str = "app_url";
    pub const DATABASE_URL: &str = "database_url";
    pub const STATE_DIR: &str = "state_dir";
    pub const IGNORE_FILE: &str = "ignore_file";
    pub const CONTAINER_NAME: &str = "container_name";
}

/// Deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs shared by every step of a run
///
/// Built once before the pipeline starts and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Mode the pipeline runs in
    pub mode: Mode,

    /// Environment file that must exist before anything runs
    pub env_file: PathBuf,

    /// Directory commands run in and relative paths resolve against
    pub working_dir: PathBuf,

    /// Ordered mode parameters (compose file, URLs, local paths)
    params: IndexMap<String, String>,
}

impl ExecutionContext {
    pub fn new(mode: Mode, env_file: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            env_file: env_file.into(),
            working_dir: working_dir.into(),
            params: IndexMap::new(),
        }
    }

    /// Add a parameter (builder style, used while the context is assembled)
    pub fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Get a parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// All parameters in insertion order
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolve a possibly relative path against the working directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// Absolute location of the environment file
    pub fn env_file_path(&self) -> PathBuf {
        self.resolve(&self.env_file)
    }
}
