//! Test: Production migration failure after launch - no rollback

use crate::helpers::*;
use stackup::core::{Mode, StepStatus};
use std::sync::Arc;

#[tokio::test]
async fn test_migration_failure_aborts_without_teardown() {
    let dir = project(Mode::Production, true);
    let invoker = Arc::new(MockInvoker::new().fail_on(&["npm", "run", "db:migrate"], 1));

    let outcome = run_mode(Mode::Production, dir.path(), invoker.clone()).await;

    assert_aborted_at(&outcome, "migrate");
    assert_eq!(outcome.exit_code(), 1);
    assert_execution_order(
        &outcome,
        &["env-file", "docker-daemon", "stack-up", "await-ready", "migrate"],
    );

    let migrate = outcome.result("migrate").unwrap();
    assert_eq!(migrate.status, StepStatus::Failed);
    let detail = migrate.detail.as_deref().unwrap();
    assert!(detail.starts_with("migrate failed"), "detail: {}", detail);
    assert!(detail.contains("code 1"), "detail: {}", detail);

    // containers stay up
    assert_eq!(invoker.count(&["docker", "compose", "-f", "docker-compose.prod.yml", "up"]), 1);
    assert!(!invoker.any_call_with_arg("down"));
    assert_eq!(invoker.calls().last().map(String::as_str), Some("npm run db:migrate"));
}

#[tokio::test]
async fn test_dev_migration_failure_stops_before_stack() {
    let dir = project(Mode::Development, true);
    let invoker = Arc::new(MockInvoker::new().fail_on(&["npm"], 127));

    let outcome = run_mode(Mode::Development, dir.path(), invoker.clone()).await;

    assert_aborted_at(&outcome, "migrate");
    assert!(outcome.result("db-probe").is_none());
    assert_eq!(invoker.count(&["docker", "compose"]), 0);
}
