//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HB_BACKEND_URL` - Origin of the bookstore backend (e.g., `https://api.hadibooks.pk`)
//!
//! ## Optional
//! - `HB_SESSION_FILE` - Where the CLI persists the session (default: `.hb-admin-session.json`)
//! - `HB_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `HB_PROFILE_RETRIES` - Profile verification retries on 401/403 (default: 3)
//! - `HB_PROFILE_BACKOFF_MS` - Delay between profile verification attempts (default: 1000)
//! - `HB_SEARCH_DEBOUNCE_MS` - List search/filter debounce (default: 500)
//! - `HB_PAGE_SIZE` - List page size (default: 10)
//! - `HB_NOTICE_DELAY_MS` - How long reset-flow notices stay up before advancing (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::session::RetryPolicy;

const DEFAULT_SESSION_FILE: &str = ".hb-admin-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend origin. Always ends with `/` so endpoint paths join under it.
    pub backend_url: Url,
    /// Session file used by the CLI.
    pub session_file: PathBuf,
    /// Per-request timeout for the HTTP client.
    pub http_timeout: Duration,
    /// Retry schedule for profile verification.
    pub profile_retry: RetryPolicy,
    /// Debounce interval for list search and filter input.
    pub search_debounce: Duration,
    /// Items per list page.
    pub page_size: u32,
    /// Delay between a reset-flow success notice and the next stage.
    pub notice_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `HB_BACKEND_URL` is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url = parse_backend_url(&get_required_env("HB_BACKEND_URL")?)?;
        let session_file =
            PathBuf::from(get_env_or_default("HB_SESSION_FILE", DEFAULT_SESSION_FILE));
        let http_timeout =
            Duration::from_secs(get_parsed_or_default("HB_HTTP_TIMEOUT_SECS", 30)?);
        let profile_retry = RetryPolicy {
            max_retries: get_parsed_or_default("HB_PROFILE_RETRIES", 3)?,
            backoff: Duration::from_millis(get_parsed_or_default(
                "HB_PROFILE_BACKOFF_MS",
                1000,
            )?),
        };
        let search_debounce =
            Duration::from_millis(get_parsed_or_default("HB_SEARCH_DEBOUNCE_MS", 500)?);
        let page_size: u32 = get_parsed_or_default("HB_PAGE_SIZE", 10)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "HB_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let notice_delay =
            Duration::from_millis(get_parsed_or_default("HB_NOTICE_DELAY_MS", 2000)?);
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            backend_url,
            session_file,
            http_timeout,
            profile_retry,
            search_debounce,
            page_size,
            notice_delay,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Configuration with defaults for everything but the backend origin.
    ///
    /// Used by tests and embedders that do not read the environment.
    #[must_use]
    pub fn for_backend(mut backend_url: Url) -> Self {
        ensure_trailing_slash(&mut backend_url);
        Self {
            backend_url,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            http_timeout: Duration::from_secs(30),
            profile_retry: RetryPolicy::default(),
            search_debounce: Duration::from_millis(500),
            page_size: 10,
            notice_delay: Duration::from_secs(2),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the backend origin, rejecting anything that is not http(s).
fn parse_backend_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("HB_BACKEND_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "HB_BACKEND_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    ensure_trailing_slash(&mut url);
    Ok(url)
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_url_adds_trailing_slash() {
        let url = parse_backend_url("https://api.hadibooks.pk").unwrap();
        assert_eq!(url.as_str(), "https://api.hadibooks.pk/");

        let url = parse_backend_url("https://hadibooks.pk/backend").unwrap();
        assert_eq!(url.as_str(), "https://hadibooks.pk/backend/");
    }

    #[test]
    fn test_parse_backend_url_rejects_other_schemes() {
        let err = parse_backend_url("ftp://hadibooks.pk").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_parse_backend_url_rejects_garbage() {
        assert!(parse_backend_url("not a url").is_err());
    }

    #[test]
    fn test_get_parsed_or_default_uses_default_when_unset() {
        let value: u32 = get_parsed_or_default("HB_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_for_backend_defaults() {
        let config = ConsoleConfig::for_backend(Url::parse("http://127.0.0.1:4000").unwrap());
        assert_eq!(config.backend_url.as_str(), "http://127.0.0.1:4000/");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.profile_retry.max_retries, 3);
        assert_eq!(config.profile_retry.backoff, Duration::from_secs(1));
        assert_eq!(config.search_debounce, Duration::from_millis(500));
        assert_eq!(config.notice_delay, Duration::from_secs(2));
    }
}
