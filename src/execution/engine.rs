//! Main execution engine - runs a pipeline step by step

use crate::{
    core::{
        ExecutionContext, FailurePolicy, Mode, Pipeline, RunOutcome, RunStatus, Step, StepResult,
        StepStatus,
    },
    execution::{ExecutionResult, StepExecutor},
};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// How loudly an event should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        mode: Mode,
        total_steps: usize,
    },
    StepStarted {
        step: String,
        title: String,
        index: usize,
        total: usize,
    },
    StepCompleted {
        step: String,
        detail: Option<String>,
    },
    StepFailed {
        step: String,
        policy: FailurePolicy,
        error: String,
        hint: Option<String>,
    },
    PipelineInterrupted {
        step: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: RunStatus,
    },
}

impl ExecutionEvent {
    pub fn severity(&self) -> Severity {
        match self {
            ExecutionEvent::StepFailed {
                policy: FailurePolicy::Warn,
                ..
            } => Severity::Warn,
            ExecutionEvent::StepFailed { .. } => Severity::Error,
            ExecutionEvent::PipelineInterrupted { .. } => Severity::Warn,
            ExecutionEvent::PipelineCompleted {
                status: RunStatus::AbortedAtStep(_),
                ..
            } => Severity::Error,
            _ => Severity::Info,
        }
    }
}

/// How long an interrupted step may keep running before it is dropped
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Main pipeline execution engine
///
/// Steps run strictly one after another. A failing `Fatal` step ends the run;
/// a failing `Warn` step is recorded and the next step still runs. Nothing is
/// rolled back.
#[derive(Clone)]
pub struct ExecutionEngine {
    executor: StepExecutor,
    event_handlers: Vec<EventHandler>,
    shutdown_grace: Duration,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self {
            executor: StepExecutor::default(),
            event_handlers: Vec::new(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long the in-flight step may finish on its own after shutdown
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the entire pipeline
    pub async fn execute(&self, pipeline: &Pipeline, ctx: &ExecutionContext) -> RunOutcome {
        self.execute_until(pipeline, ctx, std::future::pending::<()>())
            .await
    }

    /// Execute the pipeline, stopping as soon as `shutdown` resolves
    ///
    /// On shutdown the in-flight step gets the grace period to wind down
    /// (an attached child sees the same Ctrl-C and cleans up). After that it
    /// is dropped, which kills any child it still owns. No further step runs
    /// and the interrupted step is not recorded.
    pub async fn execute_until<S>(
        &self,
        pipeline: &Pipeline,
        ctx: &ExecutionContext,
        shutdown: S,
    ) -> RunOutcome
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = pipeline.len();
        let mut results = Vec::with_capacity(total);

        info!(
            "Starting {} pipeline ({} steps, {})",
            pipeline.mode, total, execution_id
        );
        self.emit_event(ExecutionEvent::PipelineStarted {
            execution_id,
            mode: pipeline.mode,
            total_steps: total,
        });

        let mut status = RunStatus::Completed;

        for (index, step) in pipeline.steps().iter().enumerate() {
            self.emit_event(ExecutionEvent::StepStarted {
                step: step.name.clone(),
                title: step.title.clone(),
                index: index + 1,
                total,
            });

            let step_started = Utc::now();
            let step_future = self.executor.execute(step, ctx);
            tokio::pin!(step_future);
            let result = tokio::select! {
                biased;
                _ = &mut shutdown => None,
                result = &mut step_future => Some(result),
            };

            let Some(result) = result else {
                warn!("Interrupted during step {}", step.name);
                if tokio::time::timeout(self.shutdown_grace, &mut step_future)
                    .await
                    .is_err()
                {
                    warn!(
                        "Step {} still running after {:?}, killing it",
                        step.name, self.shutdown_grace
                    );
                }
                self.emit_event(ExecutionEvent::PipelineInterrupted {
                    step: step.name.clone(),
                });
                status = RunStatus::Interrupted(step.name.clone());
                break;
            };

            let (record, abort) = self.record(step, result, step_started);
            results.push(record);

            if abort {
                error!("Fatal failure in step {}, aborting", step.name);
                status = RunStatus::AbortedAtStep(step.name.clone());
                break;
            }
        }

        info!("Pipeline finished: {:?}", status);
        self.emit_event(ExecutionEvent::PipelineCompleted {
            execution_id,
            status: status.clone(),
        });

        RunOutcome {
            execution_id,
            mode: pipeline.mode,
            results,
            status,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Turn an execution result into a step record; `true` means the run must stop
    fn record(
        &self,
        step: &Step,
        result: ExecutionResult,
        started_at: chrono::DateTime<Utc>,
    ) -> (StepResult, bool) {
        let (status, detail, abort) = match result {
            ExecutionResult::Success { detail } => {
                self.emit_event(ExecutionEvent::StepCompleted {
                    step: step.name.clone(),
                    detail: detail.clone(),
                });
                (StepStatus::Success, detail, false)
            }
            ExecutionResult::Failed { error } => {
                let message = error.to_string();
                if !step.is_fatal() {
                    warn!("Step {} failed, continuing: {}", step.name, message);
                }
                self.emit_event(ExecutionEvent::StepFailed {
                    step: step.name.clone(),
                    policy: step.policy,
                    error: message.clone(),
                    hint: error.hint().map(str::to_string),
                });
                (StepStatus::Failed, Some(message), step.is_fatal())
            }
        };

        let record = StepResult {
            step: step.name.clone(),
            status,
            policy: step.policy,
            detail,
            started_at,
            finished_at: Utc::now(),
        };
        (record, abort)
    }
}
