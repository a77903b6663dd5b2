//! Process invocation for external tools (container CLI, task runner)

pub mod invocation;
pub mod subprocess;

use async_trait::async_trait;
pub use invocation::{stderr_snippet, ExecError, Invocation, IoMode, ProcessOutput};
pub use subprocess::SubprocessInvoker;

/// Trait for running external commands - allows for different implementations
///
/// Implementations never retry; retry policy belongs to the caller.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    /// Run the command to completion
    ///
    /// Fails when the child cannot be spawned, exits non-zero, or exceeds the
    /// invocation's timeout.
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError>;
}
