use authload_client::ClientConfig;
use authload_common::{AuthLoadError, Endpoints, Result, Target};
use clap::Parser;
use std::time::Duration;
use tokio::time::Instant;

use crate::worker::{pacing_interval, WorkerSettings};

#[derive(Parser, Debug)]
#[command(name = "authload", about = "Generate load against the auth-session or auth-jwt stack")]
pub struct Cli {
    /// Service to stress: auth-session | auth-jwt
    #[arg(long)]
    pub target: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 100)]
    pub threads: usize,

    /// How long to run (seconds)
    #[arg(long, default_value_t = 60)]
    pub duration: u64,

    /// Approximate total requests per second across all workers (<= 0 disables pacing)
    #[arg(long, default_value_t = 200.0, allow_negative_numbers = true)]
    pub rps: f64,

    /// Create user accounts before starting the test
    #[arg(long)]
    pub signup: bool,

    /// Skip the pre-login token warmup
    #[arg(long = "no-prelogin")]
    pub no_prelogin: bool,

    /// Force a login on every JWT iteration
    #[arg(long = "no-reuse-token")]
    pub no_reuse_token: bool,

    /// Random seed for deterministic payloads
    #[arg(long)]
    pub seed: Option<u64>,

    /// Per-request timeout (seconds)
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(long, env = "AUTH_SESSION_URL", default_value = "http://localhost:8081")]
    pub auth_session_url: String,

    #[arg(long, env = "AUTH_JWT_URL", default_value = "http://localhost:8082")]
    pub auth_jwt_url: String,

    #[arg(long, env = "API_A_URL", default_value = "http://localhost:8083")]
    pub api_a_url: String,

    #[arg(long, env = "API_B_URL", default_value = "http://localhost:8084")]
    pub api_b_url: String,
}

impl Cli {
    pub fn into_config(self) -> Result<LoadConfig> {
        let target: Target = self.target.parse()?;
        let config = LoadConfig {
            target,
            threads: self.threads,
            duration: Duration::from_secs(self.duration),
            rps: self.rps,
            signup: self.signup,
            prelogin: !self.no_prelogin,
            reuse_token: !self.no_reuse_token,
            seed: self.seed,
            timeout: Duration::from_secs(self.timeout_secs),
            endpoints: Endpoints::new(
                &self.auth_session_url,
                &self.auth_jwt_url,
                &self.api_a_url,
                &self.api_b_url,
            ),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Everything a run needs, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub target: Target,
    /// Worker population size; also the number of identities generated.
    pub threads: usize,
    pub duration: Duration,
    /// Target aggregate requests per second.
    pub rps: f64,
    pub signup: bool,
    pub prelogin: bool,
    pub reuse_token: bool,
    pub seed: Option<u64>,
    pub timeout: Duration,
    pub endpoints: Endpoints,
}

impl LoadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(AuthLoadError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        if Instant::now().checked_add(self.duration).is_none() {
            return Err(AuthLoadError::InvalidConfig(format!(
                "duration of {}s is too long",
                self.duration.as_secs()
            )));
        }
        if !self.rps.is_finite() {
            return Err(AuthLoadError::InvalidConfig(format!(
                "rps must be finite, got {}",
                self.rps
            )));
        }
        if self.timeout.is_zero() {
            return Err(AuthLoadError::InvalidConfig("timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoints: self.endpoints.clone(),
            target: self.target,
            timeout: self.timeout,
        }
    }

    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            duration: self.duration,
            interval: pacing_interval(self.threads, self.rps),
            prelogin: self.prelogin,
            reuse_token: self.reuse_token,
        }
    }

    /// The two configuration lines logged at startup.
    pub fn banner(&self) -> [String; 2] {
        [
            format!(
                "[config] target={} threads={} duration={}s rps={}",
                self.target.as_name(),
                self.threads,
                self.duration.as_secs(),
                self.rps
            ),
            format!(
                "[config] reuse_token={} prelogin={} signup={}",
                self.reuse_token, self.prelogin, self.signup
            ),
        ]
    }
}
