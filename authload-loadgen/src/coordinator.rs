use authload_client::Client;
use authload_common::{Result, Target};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::bootstrap::{signup_all, BootstrapReport};
use crate::config::LoadConfig;
use crate::identity::{generate_identities, identity_for_worker};
use crate::metrics::MetricsRegistry;
use crate::payload::worker_rng;
use crate::worker::WorkerContext;
use crate::{jwt, session};

/// What a finished run hands back for reporting.
pub struct RunOutcome {
    pub metrics: Arc<MetricsRegistry>,
    /// Present when the signup phase ran.
    pub bootstrap: Option<BootstrapReport>,
    /// Wall-clock time from the first worker spawn to the last join.
    pub elapsed: Duration,
    /// Iterations run, summed over workers that returned normally.
    pub iterations: u64,
}

/// Generate identities, optionally sign them up, then run `config.threads`
/// workers in parallel and wait for every one of them to stop.
///
/// Returns `Err` only when the configuration is invalid or an HTTP client
/// cannot be built; request failures end up in the metrics.
pub async fn run_load(config: &LoadConfig) -> Result<RunOutcome> {
    config.validate()?;

    let identities = generate_identities(config.target, config.threads);

    let bootstrap = if config.signup {
        let client = Client::new(config.client_config())?;
        Some(signup_all(&client, &identities).await)
    } else {
        None
    };

    let metrics = Arc::new(MetricsRegistry::new());
    let settings = config.worker_settings();

    // Build every client up front so a failure aborts before any load starts.
    let mut contexts = Vec::with_capacity(config.threads);
    for idx in 0..config.threads {
        let Some(identity) = identity_for_worker(&identities, idx) else {
            break;
        };
        contexts.push(WorkerContext {
            client: Client::new(config.client_config())?,
            identity: identity.clone(),
            metrics: Arc::clone(&metrics),
            settings: settings.clone(),
        });
    }

    info!(
        workers = contexts.len(),
        interval_secs = settings.interval.as_secs_f64(),
        "Starting {} workers",
        config.target.as_name()
    );
    let start = Instant::now();

    let handles: Vec<_> = contexts
        .into_iter()
        .enumerate()
        .map(|(idx, ctx)| match config.target {
            Target::AuthSession => tokio::spawn(session::run(ctx)),
            Target::AuthJwt => tokio::spawn(jwt::run(ctx, worker_rng(config.seed, idx))),
        })
        .collect();

    let mut iterations: u64 = 0;
    for (idx, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(n) => iterations += n,
            Err(e) => warn!(worker = idx, error = %e, "worker did not finish cleanly"),
        }
    }

    let elapsed = start.elapsed();
    info!(elapsed_secs = elapsed.as_secs_f64(), iterations, "All workers stopped");

    Ok(RunOutcome { metrics, bootstrap, elapsed, iterations })
}
