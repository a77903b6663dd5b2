//! Step actions shared by the mode profiles

use crate::core::context::keys;
use crate::core::{BootstrapError, ComposeProject, ExecutionContext, ProbeSettings, StepAction};
use crate::host::{ensure_dir, ensure_ignore_entry, PreconditionChecker, ReadinessPoller};
use crate::process::{Invocation, IoMode, ProcessInvoker};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound for a single readiness probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

fn required_param<'a>(ctx: &'a ExecutionContext, key: &str) -> Result<&'a str, BootstrapError> {
    ctx.param(key)
        .ok_or_else(|| BootstrapError::Config(format!("missing `{}` parameter", key)))
}

/// `<runtime> compose -f <file>` prefix shared by compose invocations
fn compose_args(ctx: &ExecutionContext) -> Result<Vec<String>, BootstrapError> {
    let file = required_param(ctx, keys::COMPOSE_FILE)?;
    Ok(vec!["compose".to_string(), "-f".to_string(), file.to_string()])
}

/// Fails when the mode's environment file is absent
pub struct VerifyEnvFile {
    checker: PreconditionChecker,
}

impl VerifyEnvFile {
    pub fn new(checker: PreconditionChecker) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl StepAction for VerifyEnvFile {
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        let path = ctx.env_file_path();
        if !self.checker.check_file_exists(&path) {
            return Err(BootstrapError::PreconditionMissing {
                path: ctx.env_file.clone(),
                hint: format!(
                    "Create {} from the project template and fill in the {} credentials",
                    ctx.env_file.display(),
                    ctx.mode
                ),
            });
        }
        Ok(Some(format!("found {}", ctx.env_file.display())))
    }

    fn describe(&self, ctx: &ExecutionContext) -> String {
        format!("check that {} exists", ctx.env_file.display())
    }
}

/// Fails when the container daemon does not answer
pub struct VerifyDaemon {
    checker: PreconditionChecker,
}

impl VerifyDaemon {
    pub fn new(checker: PreconditionChecker) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl StepAction for VerifyDaemon {
    async fn run(&self, _ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        if !self.checker.check_daemon_reachable().await {
            return Err(BootstrapError::DependencyUnavailable {
                name: format!("{} daemon", self.checker.runtime()),
                hint: format!(
                    "Start {} (e.g. Docker Desktop) and try again",
                    self.checker.runtime()
                ),
            });
        }
        Ok(None)
    }

    fn describe(&self, _ctx: &ExecutionContext) -> String {
        format!("{} info", self.checker.runtime())
    }
}

/// Creates the local state directory when missing
pub struct EnsureStateDir;

#[async_trait]
impl StepAction for EnsureStateDir {
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        let dir = required_param(ctx, keys::STATE_DIR)?;
        let path = ctx.resolve(dir);
        let created = ensure_dir(&path).map_err(|source| BootstrapError::Io {
            action: "create directory",
            path: path.clone(),
            source,
        })?;

        if created {
            info!("Created {}", path.display());
            Ok(Some(format!("created {}", dir)))
        } else {
            Ok(Some(format!("{} already present", dir)))
        }
    }

    fn describe(&self, ctx: &ExecutionContext) -> String {
        format!("mkdir -p {}", ctx.param(keys::STATE_DIR).unwrap_or("<unset>"))
    }
}

/// Lists the state directory in the ignore-file
pub struct EnsureIgnoreEntry;

impl EnsureIgnoreEntry {
    fn entry(dir: &str) -> String {
        format!("{}/", dir.trim_end_matches('/'))
    }
}

#[async_trait]
impl StepAction for EnsureIgnoreEntry {
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        let dir = required_param(ctx, keys::STATE_DIR)?;
        let ignore_file = required_param(ctx, keys::IGNORE_FILE)?;
        let path = ctx.resolve(ignore_file);
        let entry = Self::entry(dir);

        let changed = ensure_ignore_entry(&path, &entry).map_err(|source| BootstrapError::Io {
            action: "update",
            path: path.clone(),
            source,
        })?;

        if changed {
            Ok(Some(format!("added {} to {}", entry, ignore_file)))
        } else {
            Ok(Some(format!("{} already lists {}", ignore_file, entry)))
        }
    }

    fn describe(&self, ctx: &ExecutionContext) -> String {
        format!(
            "list {} in {}",
            Self::entry(ctx.param(keys::STATE_DIR).unwrap_or("<unset>")),
            ctx.param(keys::IGNORE_FILE).unwrap_or("<unset>")
        )
    }
}

/// Runs a configured command with the operator's terminal attached
pub struct RunCommand {
    step: String,
    argv: Vec<String>,
    invoker: Arc<dyn ProcessInvoker>,
}

impl RunCommand {
    pub fn new(step: &str, argv: Vec<String>, invoker: Arc<dyn ProcessInvoker>) -> Self {
        Self {
            step: step.to_string(),
            argv,
            invoker,
        }
    }
}

#[async_trait]
impl StepAction for RunCommand {
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        let invocation = Invocation::from_argv(&self.argv, IoMode::Inherited)
            .ok_or_else(|| BootstrapError::Config(format!("{}: empty command", self.step)))?
            .in_dir(&ctx.working_dir);

        info!("Running {}", invocation.display());
        self.invoker
            .run(&invocation)
            .await
            .map_err(|source| BootstrapError::ProcessExecutionFailed {
                step: self.step.clone(),
                source,
            })?;
        Ok(None)
    }

    fn describe(&self, _ctx: &ExecutionContext) -> String {
        Invocation::from_argv(&self.argv, IoMode::Inherited)
            .map(|i| i.display())
            .unwrap_or_default()
    }
}

/// `compose up --build`, attached or detached
pub struct LaunchStack {
    invoker: Arc<dyn ProcessInvoker>,
    runtime: String,
    detached: bool,
}

impl LaunchStack {
    pub fn attached(invoker: Arc<dyn ProcessInvoker>, runtime: &str) -> Self {
        Self {
            invoker,
            runtime: runtime.to_string(),
            detached: false,
        }
    }

    pub fn detached(invoker: Arc<dyn ProcessInvoker>, runtime: &str) -> Self {
        Self {
            detached: true,
            ..Self::attached(invoker, runtime)
        }
    }

    fn invocation(&self, ctx: &ExecutionContext) -> Result<Invocation, BootstrapError> {
        let mut args = compose_args(ctx)?;
        args.push("up".to_string());
        args.push("--build".to_string());
        if self.detached {
            args.push("-d".to_string());
        }
        // No timeout: an attached stack runs until the operator stops it
        Ok(Invocation::inherited(&self.runtime, args).in_dir(&ctx.working_dir))
    }
}

#[async_trait]
impl StepAction for LaunchStack {
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        let invocation = self.invocation(ctx)?;
        info!("Running {}", invocation.display());
        self.invoker
            .run(&invocation)
            .await
            .map_err(|source| BootstrapError::ProcessExecutionFailed {
                step: "stack-up".to_string(),
                source,
            })?;
        Ok(None)
    }

    fn describe(&self, ctx: &ExecutionContext) -> String {
        self.invocation(ctx)
            .map(|i| i.display())
            .unwrap_or_else(|e| e.to_string())
    }
}

/// Polls a command inside a compose service until it succeeds
pub struct AwaitReadiness {
    invoker: Arc<dyn ProcessInvoker>,
    runtime: String,
    probe: ProbeSettings,
}

impl AwaitReadiness {
    pub fn new(invoker: Arc<dyn ProcessInvoker>, runtime: &str, probe: ProbeSettings) -> Self {
        Self {
            invoker,
            runtime: runtime.to_string(),
            probe,
        }
    }

    fn poller(&self) -> ReadinessPoller {
        ReadinessPoller::new(
            self.probe.max_attempts,
            Duration::from_millis(self.probe.interval_ms),
        )
    }

    fn invocation(&self, ctx: &ExecutionContext) -> Result<Invocation, BootstrapError> {
        let mut args = match self.probe.project {
            ComposeProject::Stack => compose_args(ctx)?,
            ComposeProject::Default => vec!["compose".to_string()],
        };
        args.extend(["exec".to_string(), "-T".to_string(), self.probe.service.clone()]);
        args.extend(self.probe.command.iter().cloned());
        Ok(Invocation::captured(&self.runtime, args)
            .in_dir(&ctx.working_dir)
            .with_timeout(PROBE_TIMEOUT))
    }
}

#[async_trait]
impl StepAction for AwaitReadiness {
    async fn run(&self, ctx: &ExecutionContext) -> Result<Option<String>, BootstrapError> {
        let invocation = self.invocation(ctx)?;
        let invoker = &self.invoker;
        let invocation = &invocation;

        let ready = self
            .poller()
            .wait_until_ready(move || async move {
                match invoker.run(invocation).await {
                    Ok(_) => true,
                    Err(e) => {
                        debug!("Probe failed: {}", e);
                        false
                    }
                }
            })
            .await;

        if ready {
            Ok(Some(format!("{} is ready", self.probe.service)))
        } else {
            Err(BootstrapError::ReadinessTimeout {
                target: self.probe.service.clone(),
                attempts: self.probe.max_attempts,
            })
        }
    }

    fn describe(&self, ctx: &ExecutionContext) -> String {
        match self.invocation(ctx) {
            Ok(invocation) => format!(
                "{} (up to {} x {} ms)",
                invocation.display(),
                self.probe.max_attempts,
                self.probe.interval_ms
            ),
            Err(e) => e.to_string(),
        }
    }
}
