use tokio::time::Instant;

use crate::metrics::Operation;
use crate::worker::{deadline_after, pace, WorkerContext};

/// Drive the session-auth login endpoint until the worker's deadline.
///
/// Every iteration is an independent login with the worker's identity; no
/// state carries over between iterations. Returns the number of iterations run.
pub async fn run(ctx: WorkerContext) -> u64 {
    let deadline = deadline_after(ctx.settings.duration);
    let mut iterations: u64 = 0;

    while Instant::now() < deadline {
        let iteration_start = Instant::now();
        iterations += 1;

        let outcome = ctx.client.login(&ctx.identity).await;
        ctx.record(Operation::AuthLogin, outcome);

        pace(iteration_start, ctx.settings.interval, deadline).await;
    }

    iterations
}
