//! Hero carousel commands.

use std::path::Path;

use hadi_books_admin::Console;
use hadi_books_admin::hero::HeroImageManager;
use hadi_books_admin::validation::ImageUpload;
use hadi_books_core::HeroImageId;

use super::CliError;
use crate::output;

pub async fn list(console: &Console) -> Result<(), CliError> {
    let heroes = loaded(console).await?;
    output::hero_images(&heroes);
    Ok(())
}

pub async fn add(console: &Console, image: &Path, alt_text: &str) -> Result<(), CliError> {
    let image = ImageUpload::read(image).await?;
    let mut heroes = loaded(console).await?;
    heroes.add(Some(image), alt_text).await?;
    output::line("Hero image added");
    output::hero_images(&heroes);
    Ok(())
}

/// Change alt text or file. Alt text is kept when not given.
pub async fn update(
    console: &Console,
    id: &str,
    image: Option<&Path>,
    alt_text: Option<String>,
) -> Result<(), CliError> {
    let image = match image {
        Some(path) => Some(ImageUpload::read(path).await?),
        None => None,
    };
    let id = HeroImageId::new(id);
    let mut heroes = loaded(console).await?;
    let alt_text = alt_text.unwrap_or_else(|| {
        heroes
            .images()
            .iter()
            .find(|hero| hero.id == id)
            .and_then(|hero| hero.alt_text.clone())
            .unwrap_or_default()
    });

    heroes.update(&id, image, &alt_text).await?;
    output::line("Hero image updated");
    output::hero_images(&heroes);
    Ok(())
}

pub async fn toggle(console: &Console, id: &str) -> Result<(), CliError> {
    let mut heroes = loaded(console).await?;
    heroes.toggle(&HeroImageId::new(id)).await?;
    output::hero_images(&heroes);
    Ok(())
}

pub async fn delete(console: &Console, id: &str) -> Result<(), CliError> {
    let mut heroes = loaded(console).await?;
    heroes.delete(&HeroImageId::new(id)).await?;
    output::line("Hero image deleted");
    output::hero_images(&heroes);
    Ok(())
}

/// A manager with the current list, so the active cap is known.
async fn loaded(console: &Console) -> Result<HeroImageManager, CliError> {
    let mut heroes = console.hero_images();
    heroes.refresh().await?;
    Ok(heroes)
}
