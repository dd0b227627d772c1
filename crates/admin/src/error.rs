//! Unified error handling for the console.

use thiserror::Error;

use hadi_books_core::AdminId;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::{StorageError, VerifyError};
use crate::validation::ValidationError;

/// Application-level error type for console operations.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A backend call failed. `message` is what the admin sees.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Local input check failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Profile verification failed.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// Session storage could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The id does not name an item in the current list.
    #[error("Item not found: {0}")]
    UnknownItem(String),
}

impl ConsoleError {
    /// Wrap a failed backend call, choosing the server's message when it
    /// sent one and `fallback` otherwise.
    ///
    /// Server-side failures are reported to Sentry. Local input failures
    /// come back as [`ConsoleError::Validation`].
    #[must_use]
    pub fn api(source: ApiError, fallback: &str) -> Self {
        let source = match source {
            ApiError::Invalid(err) => return Self::Validation(err),
            other => other,
        };
        let message = source.message_or(fallback);
        if matches!(source, ApiError::Http(_) | ApiError::Parse(_)) || source.is_server_error() {
            let event_id = sentry::capture_error(&source);
            tracing::error!(
                error = %source,
                sentry_event_id = %event_id,
                "Backend request error"
            );
        } else {
            tracing::warn!(error = %source, "Backend request rejected");
        }
        Self::Api { message, source }
    }

    /// The message to show the admin.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// The underlying backend error, if this came from one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { source, .. } | Self::Verify(VerifyError::Request(source)) => Some(source),
            _ => None,
        }
    }
}

/// Set the Sentry user context for the signed-in admin.
pub fn set_sentry_user(admin_id: &AdminId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.filter(|e| !e.is_empty()).map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
