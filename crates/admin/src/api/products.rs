//! Catalog endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use hadi_books_core::ProductId;

use super::{Ack, ApiError, BackendClient};
use crate::models::{BearerToken, Pagination, Product};
use crate::validation::{ImageUpload, ProductChanges, ProductDraft};

const LIST_PATH: &str = "/api/adminCtrl/list";
const ADD_PATH: &str = "/api/adminCtrl/add";

/// Query for one page of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
}

/// One page of the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct SingleProductResponse {
    product: Product,
}

impl BackendClient {
    /// Fetch one page of products matching the search and category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or decode failure.
    #[instrument(skip(self, token))]
    pub async fn list_products(
        &self,
        token: &BearerToken,
        query: &ProductQuery,
    ) -> Result<ProductPage, ApiError> {
        self.send(self.authed(Method::GET, LIST_PATH, token)?.query(query))
            .await
    }

    /// Fetch one product with its reviews.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or decode failure.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        token: &BearerToken,
        id: &ProductId,
    ) -> Result<Product, ApiError> {
        let path = format!("/api/adminCtrl/single/{id}");
        let response: SingleProductResponse =
            self.send(self.authed(Method::GET, &path, token)?).await?;
        Ok(response.product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the image is
    /// over the size limit, else `ApiError` if the backend rejects the product.
    #[instrument(skip(self, token, draft, image), fields(name = %draft.name))]
    pub async fn add_product(
        &self,
        token: &BearerToken,
        draft: ProductDraft,
        image: ImageUpload,
    ) -> Result<Ack, ApiError> {
        let form = draft.into_form(image.within_limit()?)?;
        self.send(self.authed(Method::POST, ADD_PATH, token)?.multipart(form))
            .await
    }

    /// Update a product, optionally replacing its cover image.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` without sending anything if the image is
    /// over the size limit, else `ApiError` if the backend rejects the update.
    #[instrument(skip(self, token, changes, image), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &BearerToken,
        id: &ProductId,
        changes: ProductChanges,
        image: Option<ImageUpload>,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/update/{id}");
        let mut form = changes.into_form()?;
        if let Some(image) = image {
            form = form.part("image", image.within_limit()?.into_part()?);
        }
        self.send(self.authed(Method::PUT, &path, token)?.multipart(form))
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        token: &BearerToken,
        id: &ProductId,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/remove/{id}");
        self.send(self.authed(Method::DELETE, &path, token)?).await
    }

    /// Flip a product's in-stock flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the toggle.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn toggle_product_availability(
        &self,
        token: &BearerToken,
        id: &ProductId,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/toggle-availability/{id}");
        self.send(self.authed(Method::PATCH, &path, token)?).await
    }

    /// Flip a product's bestseller flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the toggle.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn toggle_product_bestseller(
        &self,
        token: &BearerToken,
        id: &ProductId,
    ) -> Result<Ack, ApiError> {
        let path = format!("/api/adminCtrl/toggle-bestseller/{id}");
        self.send(self.authed(Method::PATCH, &path, token)?).await
    }
}
