//! Subprocess invoker - runs commands on the host with tokio

use crate::process::{stderr_snippet, ExecError, Invocation, IoMode, ProcessInvoker, ProcessOutput};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Invoker that spawns real child processes
///
/// Children are killed when the invoking future is dropped. The engine only
/// drops an interrupted step after its shutdown grace period, so an attached
/// child gets to handle Ctrl-C itself first.
#[derive(Debug, Clone, Default)]
pub struct SubprocessInvoker;

impl SubprocessInvoker {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).kill_on_drop(true);

        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        match invocation.io_mode {
            IoMode::Captured => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            IoMode::Inherited => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
        }

        command
    }

    async fn spawn_and_wait(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
        let mut command = Self::command(invocation);

        let spawn_error = |source| ExecError::Spawn {
            program: invocation.program.clone(),
            source,
        };

        let (status, output) = match invocation.io_mode {
            IoMode::Captured => {
                let output = command.output().await.map_err(spawn_error)?;
                let captured = ProcessOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                (output.status, captured)
            }
            IoMode::Inherited => {
                let status = command.status().await.map_err(spawn_error)?;
                (status, ProcessOutput::default())
            }
        };

        if !status.success() {
            let exit_code = status.code();
            let snippet = stderr_snippet(&output.stderr);
            warn!(
                "{} exited with code {:?}: {}",
                invocation.display(),
                exit_code,
                snippet
            );
            return Err(ExecError::NonZeroExit {
                command: invocation.display(),
                exit_code,
                stderr_snippet: snippet,
            });
        }

        debug!(
            "{} finished, {} bytes of stdout captured",
            invocation.display(),
            output.stdout.len()
        );

        Ok(output)
    }
}

#[async_trait]
impl ProcessInvoker for SubprocessInvoker {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
        debug!(
            "Spawning {} ({:?} I/O)",
            invocation.display(),
            invocation.io_mode
        );

        match invocation.timeout {
            Some(limit) => timeout(limit, self.spawn_and_wait(invocation))
                .await
                .map_err(|_| ExecError::Timeout {
                    command: invocation.display(),
                    timeout: limit,
                })?,
            None => self.spawn_and_wait(invocation).await,
        }
    }
}
