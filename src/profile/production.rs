//! Production profile: detached stack, readiness wait, migrations

use super::actions::{AwaitReadiness, LaunchStack, RunCommand, VerifyDaemon, VerifyEnvFile};
use super::step_names::*;
use crate::core::{Mode, ModeSettings, Pipeline, Step};
use crate::host::PreconditionChecker;
use crate::process::ProcessInvoker;
use std::sync::Arc;

/// A failed migration leaves the detached containers running.
pub fn pipeline(
    settings: &ModeSettings,
    runtime: &str,
    checker: PreconditionChecker,
    invoker: Arc<dyn ProcessInvoker>,
) -> Pipeline {
    Pipeline::new(Mode::Production)
        .step(Step::fatal(
            ENV_FILE,
            "Checking environment file",
            VerifyEnvFile::new(checker.clone()),
        ))
        .step(Step::fatal(
            DOCKER_DAEMON,
            "Checking container daemon",
            VerifyDaemon::new(checker),
        ))
        .step(Step::fatal(
            STACK_UP,
            "Starting production stack",
            LaunchStack::detached(invoker.clone(), runtime),
        ))
        .step(Step::warn(
            AWAIT_READY,
            "Waiting for services",
            AwaitReadiness::new(invoker.clone(), runtime, settings.probe.clone()),
        ))
        .step(Step::fatal(
            MIGRATE,
            "Applying database migrations",
            RunCommand::new(MIGRATE, settings.migrate.clone(), invoker),
        ))
}
