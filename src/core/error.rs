//! Error taxonomy for bootstrap steps

use crate::process::ExecError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a step failed
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A required local file is absent
    #[error("{} not found", .path.display())]
    PreconditionMissing { path: PathBuf, hint: String },

    /// A service the run depends on is not reachable
    #[error("{name} is not available")]
    DependencyUnavailable { name: String, hint: String },

    /// A child process failed to start or exited non-zero
    #[error("{step} failed: {source}")]
    ProcessExecutionFailed {
        step: String,
        #[source]
        source: ExecError,
    },

    /// A readiness probe never succeeded within its budget
    #[error("{target} not ready after {attempts} attempt(s)")]
    ReadinessTimeout { target: String, attempts: u32 },

    /// Host filesystem operation failed
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The step was wired with incomplete parameters
    #[error("configuration error: {0}")]
    Config(String),
}

impl BootstrapError {
    /// Operator guidance printed under the error, when there is any
    pub fn hint(&self) -> Option<&str> {
        match self {
            BootstrapError::PreconditionMissing { hint, .. }
            | BootstrapError::DependencyUnavailable { hint, .. } => Some(hint),
            BootstrapError::ProcessExecutionFailed { .. }
            | BootstrapError::ReadinessTimeout { .. }
            | BootstrapError::Io { .. }
            | BootstrapError::Config(_) => None,
        }
    }

    /// Short machine-friendly kind, used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            BootstrapError::PreconditionMissing { .. } => "precondition_missing",
            BootstrapError::DependencyUnavailable { .. } => "dependency_unavailable",
            BootstrapError::ProcessExecutionFailed { .. } => "process_execution_failed",
            BootstrapError::ReadinessTimeout { .. } => "readiness_timeout",
            BootstrapError::Io { .. } => "io",
            BootstrapError::Config(_) => "config",
        }
    }
}

/// Error types for loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{mode}: {message}")]
    Invalid { mode: String, message: String },
}
