//! Pipeline execution engine

pub mod engine;
pub mod executor;

pub use engine::{
    EventHandler, ExecutionEngine, ExecutionEvent, Severity, DEFAULT_SHUTDOWN_GRACE,
};
pub use executor::{ExecutionResult, StepExecutor};
