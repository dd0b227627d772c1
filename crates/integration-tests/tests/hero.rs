//! Hero carousel management against the fake backend.

#![allow(clippy::unwrap_used)]

use hadi_books_admin::ConsoleError;
use hadi_books_admin::hero::MAX_ACTIVE_HERO_IMAGES;
use hadi_books_admin::validation::{ImageUpload, ValidationError};
use hadi_books_core::HeroImageId;
use hadi_books_integration_tests::{FakeBackend, hero_image};

fn banner(name: &str) -> Option<ImageUpload> {
    Some(ImageUpload::from_bytes(name, vec![0xFF, 0xD8, 0xFF, 0xE0]))
}

#[tokio::test]
async fn test_list_hero_images() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();

    heroes.refresh().await.unwrap();

    assert_eq!(heroes.images().len(), 2);
    assert_eq!(heroes.active_count(), 1);
    assert!(!heroes.at_limit());
}

#[tokio::test]
async fn test_add_and_toggle() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();
    heroes.refresh().await.unwrap();

    heroes.add(banner("ramadan.jpg"), "Ramadan reads").await.unwrap();

    assert_eq!(heroes.images().len(), 3);
    assert_eq!(heroes.active_count(), 2);
    let added = heroes.images().last().unwrap();
    assert_eq!(added.alt_text.as_deref(), Some("Ramadan reads"));
    assert!(added.image_url.ends_with("ramadan.jpg"));

    heroes.toggle(&HeroImageId::new("h2")).await.unwrap();
    assert_eq!(heroes.active_count(), 3);
}

#[tokio::test]
async fn test_add_without_image_makes_no_request() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();
    heroes.refresh().await.unwrap();

    let err = heroes.add(None, "Empty").await.unwrap_err();

    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::MissingHeroImage)
    ));
    assert_eq!(backend.calls("POST /api/adminCtrl/hero/add"), 0);
}

#[tokio::test]
async fn test_cap_blocks_activation_without_request() {
    let backend = FakeBackend::seeded().await;
    backend.state(|s| {
        s.hero_images = (1..=MAX_ACTIVE_HERO_IMAGES)
            .map(|i| hero_image(&format!("h{i}"), &format!("Banner {i}"), true))
            .collect();
        s.hero_images.push(hero_image("spare", "Spare", false));
    });
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();
    heroes.refresh().await.unwrap();
    assert!(heroes.at_limit());
    backend.clear_calls();

    let err = heroes.add(banner("extra.jpg"), "Extra").await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::HeroLimitReached)
    ));

    let err = heroes.toggle(&HeroImageId::new("spare")).await.unwrap_err();
    assert!(matches!(
        err,
        ConsoleError::Validation(ValidationError::HeroLimitReached)
    ));
    assert!(backend.state(|s| s.calls.is_empty()));

    heroes.toggle(&HeroImageId::new("h1")).await.unwrap();
    assert_eq!(heroes.active_count(), MAX_ACTIVE_HERO_IMAGES - 1);
    assert!(!heroes.at_limit());
}

#[tokio::test]
async fn test_update_alt_text() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();
    heroes.refresh().await.unwrap();

    heroes
        .update(&HeroImageId::new("h1"), None, "Eid ul Fitr sale")
        .await
        .unwrap();

    assert_eq!(
        heroes.images()[0].alt_text.as_deref(),
        Some("Eid ul Fitr sale")
    );
    assert!(heroes.images()[0].image_url.ends_with("h1.jpg"));
}

#[tokio::test]
async fn test_delete_hero_image() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();
    heroes.refresh().await.unwrap();

    heroes.delete(&HeroImageId::new("h1")).await.unwrap();

    assert_eq!(heroes.images().len(), 1);
    assert_eq!(heroes.active_count(), 0);
}

#[tokio::test]
async fn test_missing_hero_image_reports_server_message() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let mut heroes = console.hero_images();
    heroes.refresh().await.unwrap();

    let err = heroes.delete(&HeroImageId::new("gone")).await.unwrap_err();

    assert_eq!(err.user_message(), "Hero image not found");
    assert_eq!(heroes.images().len(), 2);
}
