//! Storefront hero carousel endpoints.

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::instrument;

use hadi_books_core::HeroImageId;

use super::{Ack, ApiError, BackendClient};
use crate::models::{BearerToken, HeroImage};
use crate::validation::ImageUpload;

const LIST_PATH: &str = "/api/adminCtrl/hero/all";
const ADD_PATH: &str = "/api/adminCtrl/hero/add";

/// Every hero image plus the backend's count of active ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImageList {
    #[serde(default)]
    pub data: Vec<HeroImage>,
    #[serde(default)]
    pub active_count: usize,
}

fn hero_form(image: Option<ImageUpload>, alt_text: &str) -> Result<Form, ApiError> {
    let mut form = Form::new();
    if let Some(image) = image {
        form = form.part("image", image.into_part()?);
    }
    Ok(form.text("altText", alt_text.to_string()))
}

impl BackendClient {
    /// Fetch every hero image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or decode failure.
    #[instrument(skip_all)]
    pub async fn list_hero_images(&self, token: &BearerToken) -> Result<HeroImageList, ApiError> {
        self.send(self.authed(Method::GET, LIST_PATH, token)?).await
    }

    /// Upload a new hero image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the upload.
    #[instrument(skip(self, token, image))]
    pub async fn add_hero_image(
        &self,
        token: &BearerToken,
        image: ImageUpload,
        alt_text: &str,
    ) -> Result<Ack, ApiError> {
        let form = hero_form(Some(image), alt_text)?;
        self.send(self.authed(Method::POST, ADD_PATH, token)?.multipart(form))
            .await
    }

    /// Change a hero image's alt text and optionally replace the file.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update.
    #[instrument(skip(self, token, image), fields(hero_id = %id))]
    pub async fn update_hero_image(
        &self,
        token: &BearerToken,
        id: &HeroImageId,
        image: Option<ImageUpload>,
        alt_text: &str,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/hero/update/{id}");
        let form = hero_form(image, alt_text)?;
        self.send(self.authed(Method::PUT, &path, token)?.multipart(form))
            .await
    }

    /// Flip a hero image between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the toggle.
    #[instrument(skip(self, token), fields(hero_id = %id))]
    pub async fn toggle_hero_image(
        &self,
        token: &BearerToken,
        id: &HeroImageId,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/hero/toggle-availability/{id}");
        self.send(
            self.authed(Method::PATCH, &path, token)?
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Delete a hero image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self, token), fields(hero_id = %id))]
    pub async fn delete_hero_image(
        &self,
        token: &BearerToken,
        id: &HeroImageId,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/hero/delete/{id}");
        self.send(self.authed(Method::DELETE, &path, token)?).await
    }
}
