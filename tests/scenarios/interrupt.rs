//! Test: Operator interrupt stops the in-flight step and the run

use crate::helpers::*;
use stackup::core::{ExecutionContext, Mode, Pipeline, RunStatus, Step};
use stackup::execution::{ExecutionEngine, ExecutionEvent};
use stackup::profile::actions::RunCommand;
use stackup::process::SubprocessInvoker;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[tokio::test]
async fn test_interrupt_during_step() {
    let (after, after_calls) = CountingAction::ok();
    let pipeline = Pipeline::new(Mode::Development)
        .step(Step::fatal("stack-up", "Start", HangingAction))
        .step(Step::fatal("after", "After", after));
    let ctx = ExecutionContext::new(Mode::Development, ".env.development", ".");

    let interrupted = Arc::new(Mutex::new(Vec::new()));
    let sink = interrupted.clone();
    let mut engine = ExecutionEngine::new().with_shutdown_grace(TEST_GRACE);
    engine.add_event_handler(move |event| {
        if let ExecutionEvent::PipelineInterrupted { step } = event {
            sink.lock().unwrap().push(step);
        }
    });

    let outcome = engine
        .execute_until(&pipeline, &ctx, tokio::time::sleep(Duration::from_millis(20)))
        .await;

    assert_eq!(outcome.status, RunStatus::Interrupted("stack-up".to_string()));
    assert_eq!(outcome.exit_code(), 130);
    assert_eq!(after_calls.load(Ordering::SeqCst), 0);
    assert!(outcome.results.is_empty());
    assert_eq!(*interrupted.lock().unwrap(), vec!["stack-up".to_string()]);
}

#[tokio::test]
async fn test_interrupt_attached_dev_stack() {
    let dir = project(Mode::Development, true);
    let invoker = Arc::new(MockInvoker::new().hang_on(&["docker", "compose", "-f", "docker-compose.dev.yml", "up"]));

    let outcome = run_mode_until(
        Mode::Development,
        dir.path(),
        invoker.clone(),
        tokio::time::sleep(Duration::from_millis(50)),
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Interrupted("stack-up".to_string()));
    assert_eq!(outcome.exit_code(), 130);
    assert_execution_order(
        &outcome,
        &["env-file", "docker-daemon", "state-dir", "ignore-entry", "migrate", "db-probe"],
    );
}

/// Wait for the child to publish its pid, then send it SIGINT the way a
/// terminal Ctrl-C would
#[cfg(unix)]
async fn interrupt_child(dir: &Path) {
    let pid_file = dir.join("child.pid");
    let pid = loop {
        if let Ok(pid) = std::fs::read_to_string(&pid_file) {
            if !pid.trim().is_empty() {
                break pid.trim().to_string();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };
    tokio::process::Command::new("kill")
        .args(["-INT", &pid])
        .status()
        .await
        .unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_attached_child_cleans_up_before_exit() {
    let dir = tempfile::tempdir().unwrap();
    let script = "trap 'sleep 1; touch cleaned; exit 130' INT; \
                  echo $$ > child.pid; \
                  while :; do sleep 0.1; done";
    let argv = vec!["sh".to_string(), "-c".to_string(), script.to_string()];
    let pipeline = Pipeline::new(Mode::Development).step(Step::fatal(
        "stack-up",
        "Start",
        RunCommand::new("stack-up", argv, Arc::new(SubprocessInvoker::new())),
    ));
    let ctx = ExecutionContext::new(Mode::Development, ".env.development", dir.path());

    let outcome = ExecutionEngine::new()
        .with_shutdown_grace(Duration::from_secs(10))
        .execute_until(&pipeline, &ctx, interrupt_child(dir.path()))
        .await;

    assert_eq!(outcome.status, RunStatus::Interrupted("stack-up".to_string()));
    assert!(
        dir.path().join("cleaned").exists(),
        "the child should finish its INT handler before the run returns"
    );
}
