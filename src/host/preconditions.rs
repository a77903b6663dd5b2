//! Precondition checks - required local state, no side effects

use crate::process::{Invocation, ProcessInvoker};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Verifies that the host is ready for a run
#[derive(Clone)]
pub struct PreconditionChecker {
    invoker: Arc<dyn ProcessInvoker>,
    runtime: String,
    timeout: Duration,
}

impl PreconditionChecker {
    pub fn new(invoker: Arc<dyn ProcessInvoker>, runtime: &str, timeout: Duration) -> Self {
        Self {
            invoker,
            runtime: runtime.to_string(),
            timeout,
        }
    }

    /// Container runtime CLI this checker talks to
    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn check_file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// `<runtime> info` must exit cleanly within the timeout
    pub async fn check_daemon_reachable(&self) -> bool {
        let invocation = Invocation::captured(&self.runtime, ["info"]).with_timeout(self.timeout);
        match self.invoker.run(&invocation).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Daemon check failed: {}", e);
                false
            }
        }
    }
}
