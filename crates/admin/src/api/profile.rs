//! The signed-in admin's own profile.

use reqwest::Method;
use reqwest::multipart::Form;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use hadi_books_core::{AdminId, Email};

use super::{Ack, ApiError, BackendClient};
use crate::models::{AdminProfile, BearerToken};
use crate::validation::ImageUpload;

const PROFILE_PATH: &str = "/api/user/me";

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    admin: AdminProfile,
}

/// Fields to change on the admin's profile. `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<SecretString>,
    pub profile_picture: Option<ImageUpload>,
}

impl ProfileUpdate {
    /// Whether the update would send nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
            && self.email.is_none()
            && self
                .password
                .as_ref()
                .is_none_or(|p| p.expose_secret().is_empty())
            && self.profile_picture.is_none()
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        if let Some(name) = self.name.filter(|n| !n.is_empty()) {
            form = form.text("name", name);
        }
        if let Some(email) = self.email {
            form = form.text("email", email.into_inner());
        }
        if let Some(password) = self.password.filter(|p| !p.expose_secret().is_empty()) {
            form = form.text("password", password.expose_secret().to_string());
        }
        if let Some(picture) = self.profile_picture {
            form = form.part("profilePicture", picture.into_part()?);
        }
        Ok(form)
    }
}

impl BackendClient {
    /// Fetch the profile the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for a rejected token,
    /// `ApiError::Rejected` when the backend answers `success: false`.
    #[instrument(skip_all)]
    pub async fn fetch_profile(&self, token: &BearerToken) -> Result<AdminProfile, ApiError> {
        let response: ProfileResponse = self
            .send(self.authed(Method::GET, PROFILE_PATH, token)?)
            .await?;
        Ok(response.admin)
    }

    /// Update name, email, password, and/or profile picture.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update.
    #[instrument(skip(self, token, update), fields(admin_id = %id))]
    pub async fn update_profile(
        &self,
        token: &BearerToken,
        id: &AdminId,
        update: ProfileUpdate,
    ) -> Result<AdminProfile, ApiError> {
        let path = format!("/api/user/update/{id}");
        let form = update.into_form()?;
        let response: ProfileResponse = self
            .send(self.authed(Method::PUT, &path, token)?.multipart(form))
            .await?;
        Ok(response.admin)
    }

    /// Remove the admin's profile picture.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the removal.
    #[instrument(skip(self, token), fields(admin_id = %id))]
    pub async fn remove_profile_picture(
        &self,
        token: &BearerToken,
        id: &AdminId,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/user/remove-profile-picture/{id}");
        self.send(self.authed(Method::DELETE, &path, token)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            name: Some(String::new()),
            password: Some(SecretString::from("")),
            ..ProfileUpdate::default()
        };
        assert!(update.is_empty());
    }

    #[test]
    fn test_non_empty_update() {
        let update = ProfileUpdate {
            name: Some("Hadi".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
