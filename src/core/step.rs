//! Step domain model

use crate::core::{BootstrapError, ExecutionContext};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What a step failure does to the rest of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the pipeline; no later step runs
    Fatal,
    /// Record the failure, warn, and continue with the next step
    Warn,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Fatal => f.write_str("fatal"),
            FailurePolicy::Warn => f.write_str("warn"),
        }
    }
}

/// Unit of work performed against the execution context
#[async_trait]
pub trait StepAction: Send + Sync {
    /// Perform the work, returning optional detail worth recording (captured output, notes)
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError>;

    /// Human-readable description of what `run` will do for this context
    fn describe(&self, ctx: &ExecutionContext) -> String;
}

/// A single step in a pipeline
#[derive(Clone)]
pub struct Step {
    /// Unique step name, used in logs and outcomes
    pub name: String,

    /// Short label shown to the operator while the step runs
    pub title: String,

    /// Failure policy
    pub policy: FailurePolicy,

    /// The work itself
    pub action: Arc<dyn StepAction>,
}

impl Step {
    pub fn new(
        name: &str,
        title: &str,
        policy: FailurePolicy,
        action: impl StepAction + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            policy,
            action: Arc::new(action),
        }
    }

    pub fn fatal(name: &str, title: &str, action: impl StepAction + 'static) -> Self {
        Self::new(name, title, FailurePolicy::Fatal, action)
    }

    pub fn warn(name: &str, title: &str, action: impl StepAction + 'static) -> Self {
        Self::new(name, title, FailurePolicy::Warn, action)
    }

    pub fn is_fatal(&self) -> bool {
        self.policy == FailurePolicy::Fatal
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
