use authload_common::{
    AuthLoadError, Credentials, Endpoints, OrderRequest, RefreshRequest, Result, Target,
};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoints: Endpoints,
    /// Selects which authentication service login/signup/refresh go to.
    pub target: Target,
    pub timeout: Duration,
}

/// A response that produced an HTTP status, whatever that status was.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    /// Time from sending the request until the full body was read.
    pub latency: Duration,
    pub body: Vec<u8>,
}

impl Reply {
    /// `true` for any status below 400.
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }

    /// Decode the body as JSON. Returns `None` for error statuses and for
    /// bodies that do not decode as `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        if !self.is_ok() {
            return None;
        }
        serde_json::from_slice(&self.body).ok()
    }
}

/// HTTP client for the authentication services and the two downstream APIs.
///
/// Each instance owns its own connection pool and cookie jar, so a worker
/// holding one gets session reuse without sharing state with other workers.
pub struct Client {
    pub config: ClientConfig,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| AuthLoadError::ClientBuild(e.to_string()))?;
        Ok(Self { config, http_client })
    }

    pub fn build_auth_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoints.auth_url(self.config.target), path)
    }

    pub fn build_api_a_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoints.api_a_url, path)
    }

    pub fn build_api_b_url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoints.api_b_url, path)
    }

    /// `POST /auth/signup`
    pub async fn signup(&self, credentials: &Credentials) -> Result<Reply> {
        let request = self
            .http_client
            .post(self.build_auth_url("/auth/signup"))
            .json(credentials);
        execute(request).await
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<Reply> {
        let request = self
            .http_client
            .post(self.build_auth_url("/auth/login"))
            .json(credentials);
        execute(request).await
    }

    /// `POST /auth/refresh`
    pub async fn refresh(&self, refresh_token: &str) -> Result<Reply> {
        let body = RefreshRequest { refresh_token: refresh_token.to_string() };
        let request = self
            .http_client
            .post(self.build_auth_url("/auth/refresh"))
            .json(&body);
        execute(request).await
    }

    /// `GET /api-a/items`
    pub async fn list_items(&self, access_token: Option<&str>) -> Result<Reply> {
        let request = self.http_client.get(self.build_api_a_url("/api-a/items"));
        execute(with_bearer(request, access_token)).await
    }

    /// `POST /api-b/orders`
    pub async fn place_order(
        &self,
        access_token: Option<&str>,
        order: &OrderRequest,
    ) -> Result<Reply> {
        let request = self
            .http_client
            .post(self.build_api_b_url("/api-b/orders"))
            .json(order);
        execute(with_bearer(request, access_token)).await
    }
}

fn with_bearer(
    request: reqwest::RequestBuilder,
    access_token: Option<&str>,
) -> reqwest::RequestBuilder {
    match access_token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn execute(request: reqwest::RequestBuilder) -> Result<Reply> {
    let start = Instant::now();
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(transport_error)?;
    let latency = start.elapsed();
    Ok(Reply { status, latency, body: body.to_vec() })
}

fn transport_error(e: reqwest::Error) -> AuthLoadError {
    if e.is_timeout() {
        AuthLoadError::Timeout(e.to_string())
    } else {
        AuthLoadError::NetworkError(e.to_string())
    }
}
