use authload_client::Client;
use authload_common::Credentials;
use tracing::{info, warn};

/// How a single signup attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    /// 200 or 201.
    Created(u16),
    /// 409: the account exists from an earlier run.
    AlreadyExists,
    Rejected(u16),
    TransportFailure,
}

impl SignupOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 | 201 => SignupOutcome::Created(status),
            409 => SignupOutcome::AlreadyExists,
            other => SignupOutcome::Rejected(other),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SignupOutcome::Rejected(_) | SignupOutcome::TransportFailure)
    }
}

/// Per-outcome tallies for the signup phase. Not part of load metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub created: u64,
    pub already_exists: u64,
    pub rejected: u64,
    pub transport_failures: u64,
}

impl BootstrapReport {
    pub fn tally(&mut self, outcome: SignupOutcome) {
        match outcome {
            SignupOutcome::Created(_) => self.created += 1,
            SignupOutcome::AlreadyExists => self.already_exists += 1,
            SignupOutcome::Rejected(_) => self.rejected += 1,
            SignupOutcome::TransportFailure => self.transport_failures += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.created + self.already_exists + self.rejected + self.transport_failures
    }

    pub fn errors(&self) -> u64 {
        self.rejected + self.transport_failures
    }
}

/// Register every identity, one at a time. Failures are logged and the
/// phase moves on to the next identity.
pub async fn signup_all(client: &Client, identities: &[Credentials]) -> BootstrapReport {
    info!(
        "[bootstrap] Signing up {} users against {}",
        identities.len(),
        client.build_auth_url("")
    );

    let mut report = BootstrapReport::default();
    for identity in identities {
        let outcome = match client.signup(identity).await {
            Ok(reply) => {
                let outcome = SignupOutcome::from_status(reply.status);
                let latency_ms = reply.latency.as_secs_f64() * 1_000.0;
                if outcome.is_error() {
                    warn!(
                        "  -> signup {} failed status={}: {}",
                        identity.email,
                        reply.status,
                        String::from_utf8_lossy(&reply.body)
                    );
                } else {
                    info!(
                        "  -> signup {} status={} ({:.1} ms)",
                        identity.email, reply.status, latency_ms
                    );
                }
                outcome
            }
            Err(e) => {
                warn!("  -> signup {} exception: {}", identity.email, e);
                SignupOutcome::TransportFailure
            }
        };
        report.tally(outcome);
    }

    info!(
        created = report.created,
        already_exists = report.already_exists,
        errors = report.errors(),
        "[bootstrap] Signup phase complete"
    );
    report
}
