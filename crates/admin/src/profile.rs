//! Editing the signed-in admin's own profile.
//!
//! Every successful change is written back to the session store as a
//! full replacement, keeping the token.

use tracing::instrument;

use hadi_books_core::AdminId;

use crate::api::{ApiError, BackendClient, ProfileUpdate};
use crate::error::ConsoleError;
use crate::models::{AdminSession, BearerToken};
use crate::session::SessionStore;

/// Updates the profile of whoever holds the session.
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    client: BackendClient,
    store: SessionStore,
}

impl ProfileEditor {
    #[must_use]
    pub const fn new(client: BackendClient, store: SessionStore) -> Self {
        Self { client, store }
    }

    /// Send the filled-in fields and adopt the returned profile.
    ///
    /// An update with nothing filled in makes no request.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` for an oversized picture (no
    /// request is made), or `ConsoleError::Api` if there is no session or
    /// the backend refuses.
    #[instrument(skip_all)]
    pub async fn update(&self, mut update: ProfileUpdate) -> Result<AdminSession, ConsoleError> {
        const FALLBACK: &str = "Failed to update profile";

        if update.is_empty() {
            tracing::debug!("Empty profile update, nothing sent");
            return Ok(self.store.current());
        }
        if let Some(picture) = update.profile_picture.take() {
            update.profile_picture = Some(picture.within_limit()?);
        }

        let (token, id) = self.identity(FALLBACK)?;
        let profile = self
            .client
            .update_profile(&token, &id, update)
            .await
            .map_err(|e| ConsoleError::api(e, FALLBACK))?;

        let session = AdminSession::authenticated(token, profile);
        self.store.update(session.clone());
        tracing::info!(admin_id = %id, "Profile updated");
        Ok(session)
    }

    /// Remove the profile picture.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if there is no session or the backend
    /// refuses.
    #[instrument(skip_all)]
    pub async fn remove_picture(&self) -> Result<AdminSession, ConsoleError> {
        const FALLBACK: &str = "Failed to remove profile picture";

        let (token, id) = self.identity(FALLBACK)?;
        self.client
            .remove_profile_picture(&token, &id)
            .await
            .map_err(|e| ConsoleError::api(e, FALLBACK))?;

        let session = AdminSession {
            profile_picture: String::new(),
            ..self.store.current()
        };
        self.store.update(session.clone());
        tracing::info!(admin_id = %id, "Profile picture removed");
        Ok(session)
    }

    fn identity(&self, fallback: &str) -> Result<(BearerToken, AdminId), ConsoleError> {
        let session = self.store.current();
        match (self.store.token(), session.id) {
            (Some(token), Some(id)) => Ok((token, id)),
            _ => Err(ConsoleError::api(ApiError::NoToken, fallback)),
        }
    }
}
