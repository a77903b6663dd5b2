//! stackup - bootstraps a containerized application stack for development or production

pub mod cli;
pub mod core;
pub mod execution;
pub mod host;
pub mod process;
pub mod profile;

// Re-export commonly used types
pub use core::{
    BootstrapConfig, BootstrapError, ExecutionContext, FailurePolicy, Mode, Pipeline, RunOutcome,
    RunStatus, Step, StepAction,
};
pub use execution::{ExecutionEngine, ExecutionEvent};
pub use process::{ExecError, Invocation, ProcessInvoker, SubprocessInvoker};
pub use profile::build_pipeline;
