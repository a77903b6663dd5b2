//! Test utility functions for stackup
#![allow(dead_code)]

use async_trait::async_trait;
use stackup::core::{
    BootstrapConfig, BootstrapError, ExecutionContext, Mode, RunOutcome, RunStatus, StepAction,
};
use stackup::execution::ExecutionEngine;
use stackup::process::{ExecError, Invocation, ProcessInvoker, ProcessOutput};
use stackup::profile::build_pipeline;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Shutdown grace for tests whose interrupted steps never finish
pub const TEST_GRACE: Duration = Duration::from_millis(50);

/// What the mock does when an invocation matches a rule
#[derive(Debug, Clone)]
enum Behavior {
    Exit(i32),
    Hang,
}

/// Mock invoker that records every invocation and fails the ones it is told to
///
/// Rules match on the leading words of the command line (program first).
#[derive(Default)]
pub struct MockInvoker {
    rules: Vec<(Vec<String>, Behavior)>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` for commands starting with `prefix`
    pub fn fail_on(mut self, prefix: &[&str], code: i32) -> Self {
        self.rules.push((to_argv(prefix), Behavior::Exit(code)));
        self
    }

    /// Never return for commands starting with `prefix`
    pub fn hang_on(mut self, prefix: &[&str]) -> Self {
        self.rules.push((to_argv(prefix), Behavior::Hang));
        self
    }

    /// Recorded command lines, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(Invocation::display).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of recorded calls starting with `prefix`
    pub fn count(&self, prefix: &[&str]) -> usize {
        let prefix = to_argv(prefix);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|i| matches_prefix(i, &prefix))
            .count()
    }

    /// Whether any recorded call contains `word` as an argument
    pub fn any_call_with_arg(&self, word: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|i| i.args.iter().any(|a| a == word))
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

fn to_argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn matches_prefix(invocation: &Invocation, prefix: &[String]) -> bool {
    let argv: Vec<&String> = std::iter::once(&invocation.program)
        .chain(invocation.args.iter())
        .collect();
    argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, p)| *a == p)
}

#[async_trait]
impl ProcessInvoker for MockInvoker {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ExecError> {
        self.calls.lock().unwrap().push(invocation.clone());

        let behavior = self
            .rules
            .iter()
            .find(|(prefix, _)| matches_prefix(invocation, prefix))
            .map(|(_, b)| b.clone());

        match behavior {
            None => Ok(ProcessOutput::new("")),
            Some(Behavior::Exit(code)) => Err(ExecError::NonZeroExit {
                command: invocation.display(),
                exit_code: Some(code),
                stderr_snippet: "mock failure".to_string(),
            }),
            Some(Behavior::Hang) => std::future::pending().await,
        }
    }
}

/// Action that counts its runs and optionally fails
pub struct CountingAction {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingAction {
    pub fn ok() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                fail: false,
            },
            calls,
        )
    }

    pub fn failing() -> (Self, Arc<AtomicUsize>) {
        let (mut action, calls) = Self::ok();
        action.fail = true;
        (action, calls)
    }
}

#[async_trait]
impl StepAction for CountingAction {
    async fn run(&self, _ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(BootstrapError::DependencyUnavailable {
                name: "mock".to_string(),
                hint: "mock failure".to_string(),
            })
        } else {
            Ok(None)
        }
    }

    fn describe(&self, _ctx: &ExecutionContext) -> String {
        "count".to_string()
    }
}

/// Action that never finishes
pub struct HangingAction;

#[async_trait]
impl StepAction for HangingAction {
    async fn run(&self, _ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        std::future::pending().await
    }

    fn describe(&self, _ctx: &ExecutionContext) -> String {
        "hang".to_string()
    }
}

/// Scratch project directory, optionally with the mode's env file
pub fn project(mode: Mode, with_env_file: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    if with_env_file {
        let settings = BootstrapConfig::default().settings(mode);
        std::fs::write(dir.path().join(settings.env_file), "DATABASE_URL=postgres://test\n").unwrap();
    }
    dir
}

/// Default configuration with millisecond probe intervals
pub fn fast_config() -> BootstrapConfig {
    BootstrapConfig::from_yaml(
        r#"
development:
  probe:
    interval_ms: 1
production:
  probe:
    interval_ms: 1
"#,
    )
    .unwrap()
}

/// Run a mode pipeline in `dir` against the given invoker
pub async fn run_mode<I: ProcessInvoker + 'static>(
    mode: Mode,
    dir: &Path,
    invoker: Arc<I>,
) -> RunOutcome {
    run_mode_until(mode, dir, invoker, std::future::pending::<()>()).await
}

pub async fn run_mode_until<I, S>(mode: Mode, dir: &Path, invoker: Arc<I>, shutdown: S) -> RunOutcome
where
    I: ProcessInvoker + 'static,
    S: Future<Output = ()>,
{
    let config = fast_config();
    let ctx = config.settings(mode).to_context(mode, dir);
    let pipeline = build_pipeline(mode, &config, invoker);
    ExecutionEngine::new()
        .with_shutdown_grace(TEST_GRACE)
        .execute_until(&pipeline, &ctx, shutdown)
        .await
}

/// Assert the run completed
pub fn assert_completed(outcome: &RunOutcome) {
    assert_eq!(
        outcome.status,
        RunStatus::Completed,
        "run should be completed, results: {:?}",
        outcome.results
    );
    assert_eq!(outcome.exit_code(), 0);
}

/// Assert the run aborted at `step`
pub fn assert_aborted_at(outcome: &RunOutcome, step: &str) {
    assert_eq!(
        outcome.status,
        RunStatus::AbortedAtStep(step.to_string()),
        "results: {:?}",
        outcome.results
    );
    assert_ne!(outcome.exit_code(), 0);
    assert_eq!(
        outcome.executed_steps().last().copied(),
        Some(step),
        "the aborting step must be the last one executed"
    );
}

/// Assert specific steps were executed in order
pub fn assert_execution_order(outcome: &RunOutcome, expected: &[&str]) {
    assert_eq!(outcome.executed_steps(), expected);
}
