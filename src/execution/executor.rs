//! Step executor - runs individual step actions

use crate::core::{BootstrapError, ExecutionContext, Step};
use tracing::{debug, info, warn};

/// Result of executing a step
#[derive(Debug)]
pub enum ExecutionResult {
    /// Action finished cleanly
    Success { detail: Option<String> },
    /// Action reported an error
    Failed { error: BootstrapError },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }
}

/// Executes a single step
#[derive(Debug, Clone, Default)]
pub struct StepExecutor;

impl StepExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a step and return the result
    pub async fn execute(&self, step: &Step, context: &ExecutionContext) -> ExecutionResult {
        info!("Executing step: {}", step.name);
        debug!("Step {}: {}", step.name, step.action.describe(context));

        match step.action.run(context).await {
            Ok(detail) => {
                debug!("Step {} succeeded", step.name);
                ExecutionResult::Success { detail }
            }
            Err(error) => {
                warn!(
                    step = %step.name,
                    kind = error.kind(),
                    policy = %step.policy,
                    "Step failed: {}",
                    error
                );
                ExecutionResult::Failed { error }
            }
        }
    }
}
