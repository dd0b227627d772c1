//! Bookstore backend REST client.
//!
//! Every call goes to one backend origin. Responses share an envelope:
//! `{ "success": true, ... }` on success or `{ "success": false, "message" }`
//! on failure. Authenticated calls carry `Authorization: Bearer <token>` and
//! the client keeps a cookie store, since the backend also sets session
//! cookies.
//!
//! # Modules
//!
//! - [`auth`]: login, logout, and the password-reset endpoints
//! - [`profile`]: the admin's own profile
//! - [`products`]: catalog list, detail, and mutations
//! - [`orders`]: order list, updates, and statistics
//! - [`hero`]: storefront carousel images

pub mod auth;
pub mod hero;
pub mod orders;
pub mod products;
pub mod profile;

pub use auth::*;
pub use hero::*;
pub use orders::*;
pub use products::*;
pub use profile::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ConsoleConfig;
use crate::models::BearerToken;
use crate::validation::ValidationError;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered 401 or 403.
    #[error("Unauthorized (HTTP {status}){}", fmt_message(.message.as_deref()))]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    /// Backend answered 2xx with `success: false`.
    #[error("Request rejected{}", fmt_message(.message.as_deref()))]
    Rejected { message: Option<String> },

    /// Backend answered with any other non-success status.
    #[error("API error: HTTP {status}{}", fmt_message(.message.as_deref()))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The call needs a session token and there is none.
    #[error("No authentication token found")]
    NoToken,

    /// Input failed a local check before anything was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn fmt_message(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// Whether the backend refused the credentials (HTTP 401/403).
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether this is a server-side failure worth reporting.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }

    /// The backend's `message` field, when it sent a non-empty one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message, .. }
            | Self::Rejected { message }
            | Self::Status { message, .. } => message.as_deref(),
            Self::NoToken => Some("No authentication token found"),
            _ => None,
        }
    }

    /// The message to show the admin: the backend's message, else `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Bare acknowledgement carrying only the envelope message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    /// The acknowledgement message, else `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Bookstore backend client.
///
/// Cheap to clone; clones share one connection pool and cookie store.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner { client, base_url }),
        })
    }

    /// Create a client from console configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ApiError> {
        Self::new(config.backend_url.clone(), config.http_timeout)
    }

    /// The backend origin.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Start an unauthenticated request to `path`.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.inner.client.request(method, url))
    }

    /// Start a bearer-authenticated request to `path`.
    pub(crate) fn authed(
        &self,
        method: Method,
        path: &str,
        token: &BearerToken,
    ) -> Result<RequestBuilder, ApiError> {
        if token.is_empty() {
            return Err(ApiError::NoToken);
        }
        Ok(self.request(method, path)?.bearer_auth(token.expose()))
    }

    /// Send a request and decode the envelope into `T`.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        decode_envelope(response).await
    }
}

/// Decode a backend response.
///
/// Status is checked first (401/403, then any other failure), then the
/// `success` flag, then the body shape.
async fn decode_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;
    let parsed: Result<serde_json::Value, serde_json::Error> = serde_json::from_slice(&body);
    let message = parsed.as_ref().ok().and_then(envelope_message);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized {
            status: status.as_u16(),
            message,
        });
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let value = parsed?;
    if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
        return Err(ApiError::Rejected { message });
    }

    Ok(serde_json::from_value(value)?)
}

fn envelope_message(value: &serde_json::Value) -> Option<String> {
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .map(String::from)
}
