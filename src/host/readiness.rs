//! Readiness polling for dependent services

use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Bounded retry loop around a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPoller {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl ReadinessPoller {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Call `probe` until it reports ready or the attempt budget runs out
    ///
    /// Sleeps `interval` between attempts but not after the last one.
    /// Returns `false` after exactly `max_attempts` failed probes.
    pub async fn wait_until_ready<F, Fut>(&self, mut probe: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        for attempt in 1..=self.max_attempts {
            if probe().await {
                debug!("Ready after {} attempt(s)", attempt);
                return true;
            }
            debug!("Probe attempt {}/{} failed", attempt, self.max_attempts);

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }
        false
    }
}
