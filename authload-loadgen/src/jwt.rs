use authload_common::TokenResponse;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::time::Instant;

use crate::metrics::Operation;
use crate::payload::build_order;
use crate::worker::{deadline_after, pace, WorkerContext};

/// Idle time for an iteration that has no access token to call the APIs with.
pub const NO_TOKEN_BACKOFF: Duration = Duration::from_millis(100);

const UNAUTHORIZED: u16 = 401;

/// Token pair held by a single JWT worker. Never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl AuthState {
    fn bearer(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

/// Drive login, refresh and both downstream APIs until the worker's deadline.
/// Returns the number of iterations started.
///
/// Per iteration: log in when no token is held (or always, without token
/// reuse); call API A, and on a 401 refresh and retry API A within the same
/// iteration; call API B, and on a 401 refresh so the next iteration uses the
/// new token, without retrying API B.
pub async fn run(ctx: WorkerContext, mut rng: StdRng) -> u64 {
    let deadline = deadline_after(ctx.settings.duration);
    let mut state = AuthState::default();
    let mut iterations: u64 = 0;

    if ctx.settings.prelogin {
        state = login(&ctx).await;
    }

    'iterations: while Instant::now() < deadline {
        let iteration_start = Instant::now();
        iterations += 1;

        if state.access_token.is_none() || !ctx.settings.reuse_token {
            state = login(&ctx).await;
        }

        if state.access_token.is_none() {
            tokio::time::sleep(NO_TOKEN_BACKOFF).await;
        } else {
            loop {
                let outcome = ctx.client.list_items(state.bearer()).await;
                let status = ctx.record(Operation::ApiAItems, outcome).map(|r| r.status);
                if status != Some(UNAUTHORIZED) {
                    break;
                }
                let Some(access_token) = refresh(&ctx, &state).await else {
                    break;
                };
                state.access_token = Some(access_token);
                if Instant::now() >= deadline {
                    break 'iterations;
                }
            }

            let order = build_order(&mut rng);
            let outcome = ctx.client.place_order(state.bearer(), &order).await;
            let status = ctx.record(Operation::ApiBOrders, outcome).map(|r| r.status);
            if status == Some(UNAUTHORIZED) {
                if let Some(access_token) = refresh(&ctx, &state).await {
                    state.access_token = Some(access_token);
                }
            }
        }

        pace(iteration_start, ctx.settings.interval, deadline).await;
    }

    iterations
}

/// Log in with the worker's identity. Any failure yields an empty state.
async fn login(ctx: &WorkerContext) -> AuthState {
    let outcome = ctx.client.login(&ctx.identity).await;
    ctx.record(Operation::AuthLogin, outcome)
        .and_then(|reply| reply.json::<TokenResponse>())
        .map(|tokens| AuthState {
            access_token: non_empty(tokens.access_token),
            refresh_token: non_empty(tokens.refresh_token),
        })
        .unwrap_or_default()
}

/// Exchange the held refresh token for a new access token. No request is
/// made when no refresh token is held.
async fn refresh(ctx: &WorkerContext, state: &AuthState) -> Option<String> {
    let refresh_token = state.refresh_token.as_deref()?;
    let outcome = ctx.client.refresh(refresh_token).await;
    ctx.record(Operation::AuthRefresh, outcome)
        .and_then(|reply| reply.json::<TokenResponse>())
        .and_then(|tokens| non_empty(tokens.access_token))
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}
