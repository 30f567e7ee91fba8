use authload_client::{Client, Reply};
use authload_common::{Credentials, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::metrics::{MetricsRegistry, Operation, Sample};

/// Loop parameters shared by both worker variants.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
    /// Wall-clock run length, measured from the worker's own start.
    pub duration: Duration,
    /// Target time between iteration starts; zero disables pacing.
    pub interval: Duration,
    pub prelogin: bool,
    pub reuse_token: bool,
}

/// Everything one worker owns for the duration of its run.
pub struct WorkerContext {
    pub client: Client,
    pub identity: Credentials,
    pub metrics: Arc<MetricsRegistry>,
    pub settings: WorkerSettings,
}

impl WorkerContext {
    /// Record `outcome` under `op` and hand back the reply if there was one.
    /// Transport failures become sentinel samples and never reach the caller.
    pub fn record(&self, op: Operation, outcome: Result<Reply>) -> Option<Reply> {
        match outcome {
            Ok(reply) => {
                self.metrics.record(op, Sample::from(&reply));
                Some(reply)
            }
            Err(e) => {
                debug!(
                    operation = op.as_name(),
                    email = %self.identity.email,
                    error = %e,
                    "request failed"
                );
                self.metrics.record(op, Sample::transport_failure());
                None
            }
        }
    }
}

/// Per-worker pacing interval: the aggregate `rate` split evenly across
/// `workers`. A non-positive rate disables pacing.
pub fn pacing_interval(workers: usize, rate: f64) -> Duration {
    if rate.is_nan() || rate <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(workers as f64 / rate).unwrap_or(Duration::MAX)
}

/// Stand-in deadline for durations too long to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + duration`, saturating at [`FAR_FUTURE`] instead of overflowing.
pub fn deadline_after(duration: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(duration).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Sleep out whatever remains of `interval` since `iteration_start`, but
/// never past `deadline`.
pub async fn pace(iteration_start: Instant, interval: Duration, deadline: Instant) {
    let wake = iteration_start.checked_add(interval).map_or(deadline, |t| t.min(deadline));
    if wake > Instant::now() {
        tokio::time::sleep_until(wake).await;
    }
}
