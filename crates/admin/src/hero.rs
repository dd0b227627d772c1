//! Storefront hero carousel management.
//!
//! At most [`MAX_ACTIVE_HERO_IMAGES`] images may be active. The cap is
//! checked here against the backend's last reported active count before
//! adding or activating; the list is refetched after every change.

use tracing::instrument;

use hadi_books_core::HeroImageId;

use crate::api::BackendClient;
use crate::error::ConsoleError;
use crate::models::{BearerToken, HeroImage};
use crate::session::SessionStore;
use crate::validation::{ImageUpload, ValidationError};

/// Active images the storefront carousel can show.
pub const MAX_ACTIVE_HERO_IMAGES: usize = 10;

/// Check that one more image may become active.
///
/// # Errors
///
/// Returns `ValidationError::HeroLimitReached` at the cap.
pub const fn check_active_capacity(active_count: usize) -> Result<(), ValidationError> {
    if active_count >= MAX_ACTIVE_HERO_IMAGES {
        return Err(ValidationError::HeroLimitReached);
    }
    Ok(())
}

/// Hero images and their active count, as last fetched.
#[derive(Debug, Clone)]
pub struct HeroImageManager {
    client: BackendClient,
    store: SessionStore,
    images: Vec<HeroImage>,
    active_count: usize,
}

impl HeroImageManager {
    #[must_use]
    pub const fn new(client: BackendClient, store: SessionStore) -> Self {
        Self {
            client,
            store,
            images: Vec::new(),
            active_count: 0,
        }
    }

    #[must_use]
    pub fn images(&self) -> &[HeroImage] {
        &self.images
    }

    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Whether the active cap has been reached.
    #[must_use]
    pub const fn at_limit(&self) -> bool {
        self.active_count >= MAX_ACTIVE_HERO_IMAGES
    }

    /// Fetch every image and the active count.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` on failure; the last list is kept.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ConsoleError> {
        let token = self.token("Failed to fetch hero images")?;
        let list = self
            .client
            .list_hero_images(&token)
            .await
            .map_err(|e| ConsoleError::api(e, "Failed to fetch hero images"))?;
        tracing::debug!(
            count = list.data.len(),
            active = list.active_count,
            "Hero images loaded"
        );
        self.images = list.data;
        self.active_count = list.active_count;
        Ok(())
    }

    /// Upload a new image.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` when no image is given or the
    /// active cap is reached (no request is made), or `ConsoleError::Api`
    /// if the backend refuses.
    #[instrument(skip(self, image))]
    pub async fn add(
        &mut self,
        image: Option<ImageUpload>,
        alt_text: &str,
    ) -> Result<(), ConsoleError> {
        let image = image.ok_or(ValidationError::MissingHeroImage)?;
        check_active_capacity(self.active_count)?;

        let token = self.token("Failed to add hero image")?;
        self.client
            .add_hero_image(&token, image, alt_text)
            .await
            .map_err(|e| ConsoleError::api(e, "Failed to add hero image"))?;
        tracing::info!("Hero image added");
        self.refresh().await
    }

    /// Change an image's alt text and optionally replace its file.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the backend refuses.
    #[instrument(skip(self, image), fields(hero_id = %id))]
    pub async fn update(
        &mut self,
        id: &HeroImageId,
        image: Option<ImageUpload>,
        alt_text: &str,
    ) -> Result<(), ConsoleError> {
        let token = self.token("Failed to update hero image")?;
        self.client
            .update_hero_image(&token, id, image, alt_text)
            .await
            .map_err(|e| ConsoleError::api(e, "Failed to update hero image"))?;
        self.refresh().await
    }

    /// Flip an image between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` when activating at the cap (no
    /// request is made), or `ConsoleError::Api` if the backend refuses.
    #[instrument(skip(self), fields(hero_id = %id))]
    pub async fn toggle(&mut self, id: &HeroImageId) -> Result<(), ConsoleError> {
        let activating = self
            .images
            .iter()
            .find(|image| &image.id == id)
            .is_some_and(|image| !image.is_active);
        if activating {
            check_active_capacity(self.active_count)?;
        }

        let token = self.token("Failed to toggle availability")?;
        self.client
            .toggle_hero_image(&token, id)
            .await
            .map_err(|e| ConsoleError::api(e, "Failed to toggle availability"))?;
        self.refresh().await
    }

    /// Delete an image.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Api` if the backend refuses.
    #[instrument(skip(self), fields(hero_id = %id))]
    pub async fn delete(&mut self, id: &HeroImageId) -> Result<(), ConsoleError> {
        let token = self.token("Failed to delete hero image")?;
        self.client
            .delete_hero_image(&token, id)
            .await
            .map_err(|e| ConsoleError::api(e, "Failed to delete hero image"))?;
        tracing::info!("Hero image deleted");
        self.refresh().await
    }

    fn token(&self, fallback: &str) -> Result<BearerToken, ConsoleError> {
        self.store
            .token()
            .ok_or_else(|| ConsoleError::api(crate::api::ApiError::NoToken, fallback))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn manager() -> HeroImageManager {
        let client = BackendClient::new(
            url::Url::parse("http://127.0.0.1:9/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        HeroImageManager::new(client, SessionStore::in_memory())
    }

    fn image(id: &str, active: bool) -> HeroImage {
        HeroImage {
            id: HeroImageId::new(id),
            image_url: format!("https://cdn/{id}.jpg"),
            alt_text: None,
            is_active: active,
        }
    }

    #[test]
    fn test_capacity() {
        assert!(check_active_capacity(9).is_ok());
        assert_eq!(
            check_active_capacity(10),
            Err(ValidationError::HeroLimitReached)
        );
    }

    #[tokio::test]
    async fn test_add_without_image_is_refused() {
        let mut heroes = manager();
        let err = heroes.add(None, "Eid sale").await.unwrap_err();
        assert_eq!(err.user_message(), "Please select an image file");
    }

    #[tokio::test]
    async fn test_add_at_limit_is_refused() {
        let mut heroes = manager();
        heroes.active_count = 10;
        let err = heroes
            .add(Some(ImageUpload::from_bytes("a.jpg", vec![1])), "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Validation(ValidationError::HeroLimitReached)
        ));
    }

    #[tokio::test]
    async fn test_activate_at_limit_is_refused() {
        let mut heroes = manager();
        heroes.images = vec![image("h1", true), image("h2", false)];
        heroes.active_count = 10;

        let err = heroes.toggle(&HeroImageId::new("h2")).await.unwrap_err();
        assert!(matches!(
            err,
            ConsoleError::Validation(ValidationError::HeroLimitReached)
        ));
    }

    #[tokio::test]
    async fn test_deactivate_at_limit_reaches_backend() {
        let mut heroes = manager();
        heroes.images = vec![image("h1", true)];
        heroes.active_count = 10;

        // Passes the cap check, then stops for lack of a session.
        let err = heroes.toggle(&HeroImageId::new("h1")).await.unwrap_err();
        assert_eq!(err.user_message(), "No authentication token found");
    }
}
