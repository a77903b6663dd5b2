//! Test: Advisory readiness failures warn and continue

use crate::helpers::*;
use stackup::core::{FailurePolicy, Mode};
use std::sync::Arc;

#[tokio::test]
async fn test_dev_probe_failure_still_starts_stack() {
    let dir = project(Mode::Development, true);
    let invoker = Arc::new(MockInvoker::new().fail_on(&["docker", "compose", "exec"], 2));

    let outcome = run_mode(Mode::Development, dir.path(), invoker.clone()).await;

    assert_completed(&outcome);

    let warnings: Vec<_> = outcome.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].step, "db-probe");
    assert_eq!(warnings[0].policy, FailurePolicy::Warn);
    assert!(warnings[0]
        .detail
        .as_deref()
        .unwrap()
        .contains("neon-local not ready after 1 attempt(s)"));

    assert!(outcome.result("stack-up").unwrap().is_success());
    assert_eq!(invoker.count(&["docker", "compose", "-f", "docker-compose.dev.yml", "up"]), 1);
}

#[tokio::test]
async fn test_prod_readiness_budget_is_exhausted_then_migrates() {
    let dir = project(Mode::Production, true);
    let invoker = Arc::new(MockInvoker::new().fail_on(&["docker", "compose", "-f", "docker-compose.prod.yml", "exec"], 1));

    let outcome = run_mode(Mode::Production, dir.path(), invoker.clone()).await;

    assert_completed(&outcome);
    assert!(outcome.result("await-ready").unwrap().is_warning());
    // default production budget
    assert_eq!(invoker.count(&["docker", "compose", "-f", "docker-compose.prod.yml", "exec"]), 10);
    assert_eq!(invoker.count(&["npm", "run", "db:migrate"]), 1);
}
