//! Test: Failure policies of the pipeline executor

use crate::helpers::*;
use stackup::core::{ExecutionContext, Mode, Pipeline, RunStatus, Step};
use stackup::execution::ExecutionEngine;
use std::sync::atomic::Ordering;

fn ctx() -> ExecutionContext {
    ExecutionContext::new(Mode::Development, ".env.development", ".")
}

/// A fatal failure means no later action is invoked
#[tokio::test]
async fn test_fatal_failure_stops_pipeline() {
    let (first, first_calls) = CountingAction::ok();
    let (broken, broken_calls) = CountingAction::failing();
    let (after, after_calls) = CountingAction::ok();

    let pipeline = Pipeline::new(Mode::Development)
        .step(Step::fatal("first", "First", first))
        .step(Step::fatal("broken", "Broken", broken))
        .step(Step::fatal("after", "After", after));

    let outcome = ExecutionEngine::new().execute(&pipeline, &ctx()).await;

    assert_aborted_at(&outcome, "broken");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(broken_calls.load(Ordering::SeqCst), 1);
    assert_eq!(after_calls.load(Ordering::SeqCst), 0);
}

/// A warn failure is recorded and the next step still runs
#[tokio::test]
async fn test_warn_failure_continues() {
    let (probe, _) = CountingAction::failing();
    let (after, after_calls) = CountingAction::ok();

    let pipeline = Pipeline::new(Mode::Development)
        .step(Step::warn("probe", "Probe", probe))
        .step(Step::fatal("after", "After", after));

    let outcome = ExecutionEngine::new().execute(&pipeline, &ctx()).await;

    assert_completed(&outcome);
    assert_eq!(after_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        outcome.warnings().map(|r| r.step.as_str()).collect::<Vec<_>>(),
        vec!["probe"]
    );
}

#[tokio::test]
async fn test_empty_pipeline_completes() {
    let outcome = ExecutionEngine::new()
        .execute(&Pipeline::new(Mode::Production), &ctx())
        .await;
    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(outcome.results.is_empty());
}
