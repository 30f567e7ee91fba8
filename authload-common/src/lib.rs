use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status recorded for a request that never produced an HTTP status.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// Error types for load generator operations.
///
/// HTTP responses with a 4xx/5xx status are not errors at this layer; they are
/// returned to the caller with their status so they can be recorded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthLoadError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown target {0:?}. Valid values: auth-session, auth-jwt")]
    UnknownTarget(String),
}

impl AuthLoadError {
    /// `true` for failures that happened before a status was obtainable.
    pub fn is_transport(&self) -> bool {
        matches!(self, AuthLoadError::NetworkError(_) | AuthLoadError::Timeout(_))
    }
}

/// Result type for load generator operations
pub type Result<T> = std::result::Result<T, AuthLoadError>;

/// Authentication backend under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    AuthSession,
    AuthJwt,
}

impl Target {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "auth-session" => Some(Target::AuthSession),
            "auth-jwt" => Some(Target::AuthJwt),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            Target::AuthSession => "auth-session",
            Target::AuthJwt => "auth-jwt",
        }
    }

    /// Prefix used when generating synthetic account emails.
    pub fn user_prefix(&self) -> &'static str {
        match self {
            Target::AuthSession => "authsession",
            Target::AuthJwt => "authjwt",
        }
    }
}

impl std::str::FromStr for Target {
    type Err = AuthLoadError;

    fn from_str(s: &str) -> Result<Self> {
        Target::from_name(s).ok_or_else(|| AuthLoadError::UnknownTarget(s.to_string()))
    }
}

/// Base URLs of the four services. Stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth_session_url: String,
    pub auth_jwt_url: String,
    pub api_a_url: String,
    pub api_b_url: String,
}

impl Endpoints {
    pub fn new(
        auth_session_url: &str,
        auth_jwt_url: &str,
        api_a_url: &str,
        api_b_url: &str,
    ) -> Self {
        Self {
            auth_session_url: trim_base(auth_session_url),
            auth_jwt_url: trim_base(auth_jwt_url),
            api_a_url: trim_base(api_a_url),
            api_b_url: trim_base(api_b_url),
        }
    }

    /// Base URL of the authentication service for `target`.
    pub fn auth_url(&self, target: Target) -> &str {
        match target {
            Target::AuthSession => &self.auth_session_url,
            Target::AuthJwt => &self.auth_jwt_url,
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Synthetic account identity; also the body of signup and login requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body returned by a successful JWT login or refresh. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
}
