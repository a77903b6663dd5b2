//! Development profile: local database proxy, migrations, attached stack

use super::actions::{
    AwaitReadiness, EnsureIgnoreEntry, EnsureStateDir, LaunchStack, RunCommand, VerifyDaemon,
    VerifyEnvFile,
};
use super::step_names::*;
use crate::core::{Mode, ModeSettings, Pipeline, Step};
use crate::host::PreconditionChecker;
use crate::process::ProcessInvoker;
use std::sync::Arc;

pub fn pipeline(
    settings: &ModeSettings,
    runtime: &str,
    checker: PreconditionChecker,
    invoker: Arc<dyn ProcessInvoker>,
) -> Pipeline {
    let mut pipeline = Pipeline::new(Mode::Development)
        .step(Step::fatal(
            ENV_FILE,
            "Checking environment file",
            VerifyEnvFile::new(checker.clone()),
        ))
        .step(Step::fatal(
            DOCKER_DAEMON,
            "Checking container daemon",
            VerifyDaemon::new(checker),
        ));

    // Without a state directory there is no local proxy data to prepare
    if settings.state_dir.is_some() {
        pipeline = pipeline
            .step(Step::fatal(
                STATE_DIR,
                "Preparing local state directory",
                EnsureStateDir,
            ))
            .step(Step::fatal(
                IGNORE_ENTRY,
                "Updating ignore file",
                EnsureIgnoreEntry,
            ));
    }

    pipeline
        .step(Step::fatal(
            MIGRATE,
            "Applying database migrations",
            RunCommand::new(MIGRATE, settings.migrate.clone(), invoker.clone()),
        ))
        .step(Step::warn(
            DB_PROBE,
            "Probing database proxy",
            AwaitReadiness::new(invoker.clone(), runtime, settings.probe.clone()),
        ))
        .step(Step::fatal(
            STACK_UP,
            "Starting development stack",
            LaunchStack::attached(invoker, runtime),
        ))
}
