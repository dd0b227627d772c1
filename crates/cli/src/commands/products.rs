//! Catalog commands.
//!
//! Listing goes through the product list controller. Single-product
//! commands call the backend directly by id.

use std::path::Path;

use hadi_books_admin::listing::CategoryFilter;
use hadi_books_admin::validation::{ImageUpload, ProductChanges, ProductDraft};
use hadi_books_admin::{Console, ConsoleError};
use hadi_books_core::ProductId;

use super::{CliError, read_text, token};
use crate::output;

/// List one page of products.
pub async fn list(
    console: &Console,
    page: u32,
    search: Option<String>,
    category: Option<String>,
) -> Result<(), CliError> {
    let products = console.products();
    if let Some(category) = category {
        products.change_filter(CategoryFilter::new(category)).await?;
    }
    if let Some(search) = search {
        products.search(&search).await?;
    }
    // Fetch right away instead of waiting out the debounce
    products.cancel_pending();
    products.fetch(page).await?;

    output::products(&products.state());
    Ok(())
}

pub async fn show(console: &Console, id: &str) -> Result<(), CliError> {
    let token = token(console)?;
    let product = console
        .client()
        .get_product(&token, &ProductId::new(id))
        .await
        .map_err(|e| ConsoleError::api(e, "Failed to fetch product"))?;
    output::product(&product);
    Ok(())
}

/// Add a product described by a JSON file.
pub async fn add(console: &Console, json: &Path, image: &Path) -> Result<(), CliError> {
    let draft = ProductDraft::from_json(&read_text(json).await?)?;
    let image = ImageUpload::read(image).await?;

    let token = token(console)?;
    let ack = console
        .client()
        .add_product(&token, draft, image)
        .await
        .map_err(|e| ConsoleError::api(e, "Failed to add product"))?;
    output::line(&ack.message_or("Product added successfully"));
    Ok(())
}

/// Apply the fields present in a JSON file to a product.
pub async fn update(
    console: &Console,
    id: &str,
    json: &Path,
    image: Option<&Path>,
) -> Result<(), CliError> {
    let changes = ProductChanges::from_json(&read_text(json).await?)?;
    let image = match image {
        Some(path) => Some(ImageUpload::read(path).await?),
        None => None,
    };

    let token = token(console)?;
    let ack = console
        .client()
        .update_product(&token, &ProductId::new(id), changes, image)
        .await
        .map_err(|e| ConsoleError::api(e, "Failed to update product"))?;
    output::line(&ack.message_or("Product updated successfully"));
    Ok(())
}

pub async fn toggle_availability(console: &Console, id: &str) -> Result<(), CliError> {
    let token = token(console)?;
    let ack = console
        .client()
        .toggle_product_availability(&token, &ProductId::new(id))
        .await
        .map_err(|e| ConsoleError::api(e, "Failed to toggle availability"))?;
    output::line(&ack.message_or("Availability updated"));
    Ok(())
}

pub async fn toggle_bestseller(console: &Console, id: &str) -> Result<(), CliError> {
    let token = token(console)?;
    let ack = console
        .client()
        .toggle_product_bestseller(&token, &ProductId::new(id))
        .await
        .map_err(|e| ConsoleError::api(e, "Failed to toggle bestseller status"))?;
    output::line(&ack.message_or("Bestseller status updated"));
    Ok(())
}

pub async fn delete(console: &Console, id: &str) -> Result<(), CliError> {
    let token = token(console)?;
    let ack = console
        .client()
        .delete_product(&token, &ProductId::new(id))
        .await
        .map_err(|e| ConsoleError::api(e, "Failed to delete product"))?;
    output::line(&ack.message_or("Product deleted"));
    Ok(())
}
