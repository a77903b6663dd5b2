//! Execution state models

use crate::core::{FailurePolicy, Mode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process exit code for a run that reached the end of its pipeline
pub const EXIT_COMPLETED: i32 = 0;
/// Process exit code for a run aborted by a fatal step
pub const EXIT_ABORTED: i32 = 1;
/// Process exit code for a run stopped by an operator interrupt (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

/// Terminal status of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Success,
    Failed,
}

/// Result of executing one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Step name
    pub step: String,

    /// Terminal status
    pub status: StepStatus,

    /// Policy the step ran under
    pub policy: FailurePolicy,

    /// Captured output on success, error message on failure
    pub detail: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }

    /// A failure that did not stop the pipeline
    pub fn is_warning(&self) -> bool {
        self.status == StepStatus::Failed && self.policy == FailurePolicy::Warn
    }
}

/// Final status of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Every step reached a terminal result (warn-policy failures included)
    Completed,
    /// A fatal step failed; nothing after it ran
    AbortedAtStep(String),
    /// An operator interrupt stopped the named step; nothing after it ran
    Interrupted(String),
}

/// Aggregate outcome of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Unique execution ID
    pub execution_id: Uuid,

    /// Mode the pipeline ran in
    pub mode: Mode,

    /// One result per executed step, in execution order
    pub results: Vec<StepResult>,

    /// Final status
    pub status: RunStatus,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Completed => EXIT_COMPLETED,
            RunStatus::AbortedAtStep(_) => EXIT_ABORTED,
            RunStatus::Interrupted(_) => EXIT_INTERRUPTED,
        }
    }

    /// Warn-policy failures recorded along the way
    pub fn warnings(&self) -> impl Iterator<Item = &StepResult> {
        self.results.iter().filter(|r| r.is_warning())
    }

    /// Result of a specific step, if it ran
    pub fn result(&self, step: &str) -> Option<&StepResult> {
        self.results.iter().find(|r| r.step == step)
    }

    /// Names of the steps that ran, in order
    pub fn executed_steps(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.step.as_str()).collect()
    }
}
