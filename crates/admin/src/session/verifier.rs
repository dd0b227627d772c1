//! Profile verification with retry.
//!
//! Checks that the stored token is still accepted by fetching the admin's
//! own profile. Authorization failures are retried on a fixed schedule; once
//! the retries are spent the session is cleared. Any other failure is
//! returned as is and leaves the session alone.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use super::store::SessionStore;
use crate::api::{ApiError, BackendClient};
use crate::models::{AdminProfile, AdminSession, BearerToken};

/// Anything that can resolve a token to the profile it belongs to.
pub trait ProfileSource: Send + Sync {
    fn fetch_profile(
        &self,
        token: &BearerToken,
    ) -> impl Future<Output = Result<AdminProfile, ApiError>> + Send;
}

impl ProfileSource for BackendClient {
    fn fetch_profile(
        &self,
        token: &BearerToken,
    ) -> impl Future<Output = Result<AdminProfile, ApiError>> + Send {
        Self::fetch_profile(self, token)
    }
}

/// Retry schedule for authorization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Total attempts are `max_retries + 1`.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// What a successful verification run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// No token was held, so no request was made.
    NoToken,
    /// The token is valid; the session now carries the fresh profile.
    Verified(AdminSession),
    /// The session's token changed while the check was in flight, so the
    /// result was dropped.
    Superseded,
}

/// Verification failures.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The backend kept refusing the token; the session was cleared.
    #[error("Session rejected after {attempts} attempts")]
    Rejected { attempts: u32 },
    /// A non-authorization failure. The session was left as is.
    #[error(transparent)]
    Request(#[from] ApiError),
}

/// Checks the stored token against the backend.
pub struct ProfileVerifier<S = BackendClient> {
    source: S,
    store: SessionStore,
    policy: RetryPolicy,
}

impl<S: ProfileSource> ProfileVerifier<S> {
    #[must_use]
    pub const fn new(source: S, store: SessionStore, policy: RetryPolicy) -> Self {
        Self {
            source,
            store,
            policy,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Verify the current token and refresh the profile fields.
    ///
    /// Returns immediately without a request when no token is held. On
    /// success the store is updated with the returned identity, keeping
    /// the token.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Rejected` after the retries are exhausted on
    /// authorization failures (the session is cleared), or
    /// `VerifyError::Request` for any other failure (the session is kept).
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<VerifyOutcome, VerifyError> {
        let Some(token) = self.store.token() else {
            return Ok(VerifyOutcome::NoToken);
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = self.source.fetch_profile(&token).await;

            if !self.still_current(&token) {
                tracing::debug!("Session changed during verification, dropping result");
                return Ok(VerifyOutcome::Superseded);
            }

            match result {
                Ok(profile) => {
                    let session = AdminSession::authenticated(token, profile);
                    self.store.update(session.clone());
                    return Ok(VerifyOutcome::Verified(session));
                }
                Err(e) if is_rejection(&e) => {
                    if attempts > self.policy.max_retries {
                        tracing::warn!(attempts, "Token rejected, clearing session");
                        self.store.clear();
                        return Err(VerifyError::Rejected { attempts });
                    }
                    tracing::debug!(
                        attempts,
                        backoff_ms = self.policy.backoff.as_millis(),
                        "Token rejected, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff).await;
                    if !self.still_current(&token) {
                        return Ok(VerifyOutcome::Superseded);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Profile verification failed");
                    return Err(VerifyError::Request(e));
                }
            }
        }
    }

    fn still_current(&self, token: &BearerToken) -> bool {
        self.store.token().as_ref() == Some(token)
    }
}

/// 401/403, or a 2xx `success: false` from the profile endpoint, which is
/// how the backend reports an unknown admin behind a well-formed token.
const fn is_rejection(error: &ApiError) -> bool {
    matches!(
        error,
        ApiError::Unauthorized { .. } | ApiError::Rejected { .. }
    )
}
