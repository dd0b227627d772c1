//! The product list against the fake backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use hadi_books_admin::ConsoleError;
use hadi_books_admin::api::ApiError;
use hadi_books_admin::listing::{CategoryFilter, FetchOutcome, ProductList, ProductMutation};
use hadi_books_admin::validation::{
    ImageUpload, MAX_IMAGE_BYTES, ProductChanges, ProductDraft, ValidationError,
};
use hadi_books_core::{Price, ProductId};
use hadi_books_integration_tests::{FakeBackend, book};
use serde_json::json;

const LIST: &str = "GET /api/adminCtrl/list";

/// Value of the form part `name` in the last product form received.
fn form_field(backend: &FakeBackend, name: &str) -> Option<String> {
    backend.state(|s| {
        s.last_form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    })
}

fn oversized(file_name: &str) -> ImageUpload {
    let size = usize::try_from(MAX_IMAGE_BYTES).unwrap() + 1;
    ImageUpload::from_bytes(file_name, vec![0; size])
}

/// Wait until the list has applied a fetch for `search`.
async fn settled(list: &ProductList, search: &str) {
    let mut rx = list.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        rx.wait_for(|state| {
            !state.loading
                && state
                    .last_query
                    .as_ref()
                    .is_some_and(|query| query.search == search)
        }),
    )
    .await
    .unwrap()
    .unwrap();
}

#[tokio::test]
async fn test_list_shows_every_product_on_one_page() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();

    let outcome = list.fetch(1).await.unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    let state = list.state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.total, 3);
    assert_eq!(state.pages, 1);
    assert_eq!(state.page, 1);
    assert!(state.empty_message.is_none());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_toggle_availability_patches_in_place() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();
    list.fetch(1).await.unwrap();
    backend.clear_calls();

    list.mutate("p2", ProductMutation::ToggleAvailability)
        .await
        .unwrap();

    let state = list.state();
    let raja = state.items.iter().find(|p| p.id.as_str() == "p2").unwrap();
    assert!(!raja.availability);
    assert_eq!(
        backend.calls("PATCH /api/adminCtrl/toggle-availability/p2"),
        1
    );
    assert_eq!(backend.calls(LIST), 0);
    assert!(backend.state(|s| s.products[1]["availability"] == false));
}

#[tokio::test]
async fn test_delete_adjusts_totals() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();
    list.fetch(1).await.unwrap();

    list.mutate("p1", ProductMutation::Delete).await.unwrap();

    let state = list.state();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.total, 2);
    assert_eq!(backend.calls("DELETE /api/adminCtrl/remove/p1"), 1);
    assert_eq!(backend.state(|s| s.products.len()), 2);
}

#[tokio::test]
async fn test_search_waits_for_debounce() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();
    list.fetch(1).await.unwrap();
    backend.clear_calls();

    let outcome = list.search("raja").await.unwrap();

    assert_eq!(outcome, FetchOutcome::Scheduled);
    assert_eq!(backend.calls(LIST), 0);

    settled(&list, "raja").await;
    let state = list.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Raja Gidh");
    assert_eq!(backend.calls(LIST), 1);
}

#[tokio::test]
async fn test_short_search_fetches_everything_at_once() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();

    let outcome = list.search("r").await.unwrap();

    assert_eq!(outcome, FetchOutcome::Applied);
    let state = list.state();
    assert_eq!(state.search, "r");
    assert_eq!(state.last_query.unwrap().search, "");
    assert_eq!(state.items.len(), 3);
}

#[tokio::test]
async fn test_search_without_matches_shows_message() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();

    list.search("zz").await.unwrap();
    settled(&list, "zz").await;

    let state = list.state();
    assert!(state.items.is_empty());
    assert_eq!(state.empty_message, Some("No products found"));
}

#[tokio::test]
async fn test_empty_catalog_shows_message() {
    let backend = FakeBackend::seeded().await;
    backend.state(|s| s.products.clear());
    let console = backend.signed_in().await;
    let list = console.products();

    list.fetch(1).await.unwrap();

    assert_eq!(list.state().empty_message, Some("No products available yet"));
}

#[tokio::test]
async fn test_category_filter_narrows_list() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();

    list.change_filter(CategoryFilter::new("English Fiction"))
        .await
        .unwrap();
    let mut rx = list.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        rx.wait_for(|state| {
            state
                .last_query
                .as_ref()
                .is_some_and(|query| query.filter.0 == "English Fiction")
        }),
    )
    .await
    .unwrap()
    .unwrap();

    let state = list.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].author, "Mohsin Hamid");
}

#[tokio::test]
async fn test_paging_through_catalog() {
    let backend = FakeBackend::seeded().await;
    backend.state(|s| {
        s.products = (1..=25)
            .map(|i| book(&format!("b{i}"), &format!("Book {i}"), "Author", "Poetry", 500))
            .collect();
    });
    let console = backend.signed_in().await;
    let list = console.products();
    list.fetch(1).await.unwrap();
    assert_eq!(list.state().pages, 3);

    assert_eq!(list.change_page(3).await.unwrap(), FetchOutcome::Applied);
    assert_eq!(list.state().items.len(), 5);
    assert_eq!(list.state().page, 3);

    backend.clear_calls();
    assert_eq!(list.change_page(4).await.unwrap(), FetchOutcome::Ignored);
    assert_eq!(list.change_page(0).await.unwrap(), FetchOutcome::Ignored);
    assert_eq!(backend.calls(LIST), 0);
}

#[tokio::test]
async fn test_failed_fetch_keeps_items() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let list = console.products();
    list.fetch(1).await.unwrap();
    backend.state(|s| s.token = None);

    let err = list.refresh().await.unwrap_err();

    assert!(matches!(err, ConsoleError::Api { .. }));
    let state = list.state();
    assert_eq!(state.items.len(), 3);
    assert_eq!(state.error.as_deref(), Some("Not authorized, token failed"));
}

#[tokio::test]
async fn test_add_product_sends_draft_and_image() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let token = console.session().token().unwrap();
    let draft = ProductDraft::from_json(
        r#"{
            "name": "Udaas Naslain",
            "description": "A novel of the partition years",
            "price": 1500,
            "category": "Urdu Fiction",
            "subCategories": "Classics, Partition",
            "author": "Abdullah Hussain",
            "language": "Urdu"
        }"#,
    )
    .unwrap();

    let ack = console
        .client()
        .add_product(&token, draft, ImageUpload::from_bytes("udaas.jpg", vec![0xFF, 0xD8]))
        .await
        .unwrap();

    assert_eq!(ack.message_or(""), "Product added successfully");
    assert_eq!(form_field(&backend, "name").as_deref(), Some("Udaas Naslain"));
    assert_eq!(form_field(&backend, "price").as_deref(), Some("1500"));
    assert_eq!(
        form_field(&backend, "subCategories").as_deref(),
        Some(r#"["Classics","Partition"]"#)
    );
    assert_eq!(form_field(&backend, "image").as_deref(), Some("udaas.jpg"));
    assert!(form_field(&backend, "originalPrice").is_none());
    assert!(form_field(&backend, "isbn").is_none());

    let list = console.products();
    list.fetch(1).await.unwrap();
    let state = list.state();
    assert_eq!(state.total, 4);
    assert_eq!(state.items[0].name, "Udaas Naslain");
    assert_eq!(state.items[0].sub_categories, vec!["Classics", "Partition"]);
    assert_eq!(
        state.items[0].image.as_deref(),
        Some("https://cdn.hadibooks.pk/books/udaas.jpg")
    );
}

#[tokio::test]
async fn test_update_product_sends_only_changed_fields() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let token = console.session().token().unwrap();
    let changes = ProductChanges::from_json(
        r#"{"price": "950", "originalPrice": 1100, "isbn": "978-969-35-2200-1", "bestseller": true}"#,
    )
    .unwrap();

    console
        .client()
        .update_product(
            &token,
            &ProductId::new("p1"),
            changes,
            Some(ImageUpload::from_bytes("aangan-2.jpg", vec![0xFF, 0xD8])),
        )
        .await
        .unwrap();

    assert_eq!(form_field(&backend, "price").as_deref(), Some("950"));
    assert_eq!(form_field(&backend, "originalPrice").as_deref(), Some("1100"));
    assert_eq!(form_field(&backend, "isbn").as_deref(), Some("978-969-35-2200-1"));
    assert_eq!(form_field(&backend, "bestseller").as_deref(), Some("true"));
    assert_eq!(form_field(&backend, "image").as_deref(), Some("aangan-2.jpg"));
    assert!(form_field(&backend, "name").is_none());
    assert!(form_field(&backend, "subCategories").is_none());

    let product = console
        .client()
        .get_product(&token, &ProductId::new("p1"))
        .await
        .unwrap();
    assert_eq!(product.name, "Aangan");
    assert_eq!(product.price, Price::parse_positive("950").unwrap());
    assert_eq!(product.original_price, Some(Price::parse_positive("1100").unwrap()));
    assert_eq!(product.isbn.as_deref(), Some("978-969-35-2200-1"));
    assert!(product.bestseller);
    assert_eq!(
        product.image.as_deref(),
        Some("https://cdn.hadibooks.pk/books/aangan-2.jpg")
    );
}

#[tokio::test]
async fn test_single_product_includes_reviews() {
    let backend = FakeBackend::seeded().await;
    backend.state(|s| {
        s.products[2]["reviews"] = json!([
            {"id": "r1", "user": {"name": "Zara"}, "rating": 4, "comment": "Gripping", "createdAt": "2024-01-05T09:00:00Z"},
            {"id": "r2", "rating": 5, "createdAt": "2024-03-01T10:00:00Z"},
        ]);
    });
    let console = backend.signed_in().await;
    let token = console.session().token().unwrap();

    let product = console
        .client()
        .get_product(&token, &ProductId::new("p3"))
        .await
        .unwrap();

    assert_eq!(product.id, ProductId::new("p3"));
    assert_eq!(product.author, "Mohsin Hamid");
    assert_eq!(product.language, "English");
    assert!(product.availability);
    let reviews = product.reviews_newest_first();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].rating, 5);
    assert_eq!(reviews[0].author_name(), "Anonymous");
    assert_eq!(reviews[1].author_name(), "Zara");
    assert_eq!(backend.calls("GET /api/adminCtrl/single/p3"), 1);
}

#[tokio::test]
async fn test_single_product_not_found() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let token = console.session().token().unwrap();

    let err = console
        .client()
        .get_product(&token, &ProductId::new("p404"))
        .await
        .unwrap_err();

    let err = ConsoleError::api(err, "Failed to fetch product");
    assert_eq!(err.user_message(), "Product not found");
}

#[tokio::test]
async fn test_oversized_image_is_refused_before_sending() {
    let backend = FakeBackend::seeded().await;
    let console = backend.signed_in().await;
    let token = console.session().token().unwrap();
    let draft = ProductDraft::from_json(
        r#"{"name": "Basti", "description": "Novel", "price": 900, "category": "Urdu Fiction", "author": "Intizar Husain", "language": "Urdu"}"#,
    )
    .unwrap();
    backend.clear_calls();

    let err = console
        .client()
        .add_product(&token, draft, oversized("basti.jpg"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(ValidationError::ImageTooLarge)));

    let err = console
        .client()
        .update_product(
            &token,
            &ProductId::new("p1"),
            ProductChanges::default(),
            Some(oversized("aangan.jpg")),
        )
        .await
        .unwrap_err();
    let err = ConsoleError::api(err, "Failed to update product");
    assert_eq!(err.user_message(), "Image size exceeds 250KB limit");

    assert!(backend.state(|s| s.calls.is_empty()));
    assert_eq!(backend.state(|s| s.products.len()), 3);
}
