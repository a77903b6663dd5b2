//! Mode profiles - which steps run, in which order, under which policy

pub mod actions;
pub mod development;
pub mod production;

use crate::core::{BootstrapConfig, Mode, Pipeline};
use crate::host::PreconditionChecker;
use crate::process::ProcessInvoker;
use std::sync::Arc;
use std::time::Duration;

/// Step names as they appear in logs and outcomes
pub mod step_names {
    pub const ENV_FILE: &str = "env-file";
    pub const DOCKER_DAEMON: &str = "docker-daemon";
    pub const STATE_DIR: &str = "state-dir";
    pub const IGNORE_ENTRY: &str = "ignore-entry";
    pub const MIGRATE: &str = "migrate";
    pub const DB_PROBE: &str = "db-probe";
    pub const STACK_UP: &str = "stack-up";
    pub const AWAIT_READY: &str = "await-ready";
}

/// Build the pipeline for `mode` from the resolved configuration
pub fn build_pipeline(
    mode: Mode,
    config: &BootstrapConfig,
    invoker: Arc<dyn ProcessInvoker>,
) -> Pipeline {
    let settings = config.settings(mode);
    let checker = PreconditionChecker::new(
        invoker.clone(),
        &config.runtime,
        Duration::from_secs(config.daemon_timeout_secs),
    );

    match mode {
        Mode::Development => development::pipeline(&settings, &config.runtime, checker, invoker),
        Mode::Production => production::pipeline(&settings, &config.runtime, checker, invoker),
    }
}
