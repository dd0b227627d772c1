//! Command implementations.
//!
//! Each command works on a [`Console`] whose session lives in
//! `HB_SESSION_FILE`, so a login carries over to later invocations.

pub mod auth;
pub mod dashboard;
pub mod hero;
pub mod orders;
pub mod products;
pub mod profile;
pub mod reset;

use std::path::Path;

use hadi_books_admin::config::ConfigError;
use hadi_books_admin::models::BearerToken;
use hadi_books_admin::session::VerifyError;
use hadi_books_admin::validation::ValidationError;
use hadi_books_admin::{Console, ConsoleError};
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No session on disk, or it was rejected.
    #[error("Not logged in. Run `hb-admin login` first.")]
    NotLoggedIn,

    #[error("Could not read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read input: {0}")]
    Input(#[from] std::io::Error),
}

/// Restore and verify the saved session.
///
/// A backend that cannot be reached leaves the session in place and the
/// command goes ahead; a rejected token ends it.
pub async fn restore_session(console: &Console) -> Result<(), CliError> {
    match console.initialize().await {
        Ok(_) => {}
        Err(ConsoleError::Verify(VerifyError::Rejected { attempts })) => {
            tracing::warn!(attempts, "Saved session was rejected");
            return Err(CliError::NotLoggedIn);
        }
        Err(ConsoleError::Verify(VerifyError::Request(e))) => {
            tracing::warn!(error = %e, "Could not verify saved session");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// The session token, or `NotLoggedIn`.
pub fn token(console: &Console) -> Result<BearerToken, CliError> {
    console.session().token().ok_or(CliError::NotLoggedIn)
}

/// Read a UTF-8 file named on the command line.
pub async fn read_text(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.display().to_string(),
            source,
        })
}
