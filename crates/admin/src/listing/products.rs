//! The catalog list.

use tracing::instrument;

use hadi_books_core::ProductId;

use super::controller::{
    ListFilter, ListMessages, ListPage, ListQuery, ListSource, MIN_SEARCH_CHARS, MutationOutcome,
};
use crate::api::{ApiError, BackendClient, ProductQuery};
use crate::models::Product;
use crate::session::SessionStore;

/// Category filter. Values shorter than two characters mean no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter(pub String);

impl CategoryFilter {
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self(category.into())
    }

    fn effective(&self) -> &str {
        let category = self.0.trim();
        if category.chars().count() < MIN_SEARCH_CHARS {
            ""
        } else {
            category
        }
    }
}

impl ListFilter for CategoryFilter {
    fn is_active(&self) -> bool {
        !self.effective().is_empty()
    }

    fn needs_debounce(&self) -> bool {
        self.is_active()
    }

    fn normalized(&self) -> Self {
        Self(self.effective().to_string())
    }
}

/// Changes an admin can make from the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductMutation {
    ToggleAvailability,
    ToggleBestseller,
    Delete,
}

/// Pages through the catalog for the signed-in admin.
#[derive(Debug, Clone)]
pub struct ProductSource {
    client: BackendClient,
    store: SessionStore,
}

impl ProductSource {
    #[must_use]
    pub const fn new(client: BackendClient, store: SessionStore) -> Self {
        Self { client, store }
    }
}

impl ListSource for ProductSource {
    type Item = Product;
    type Filter = CategoryFilter;
    type Mutation = ProductMutation;

    const MESSAGES: ListMessages = ListMessages {
        no_results: "No products found",
        no_data: "No products available yet",
        fetch_failed: "Failed to fetch products",
    };

    #[instrument(skip(self))]
    async fn fetch(
        &self,
        query: &ListQuery<CategoryFilter>,
    ) -> Result<ListPage<Product>, ApiError> {
        let token = self.store.token().ok_or(ApiError::NoToken)?;
        let request = ProductQuery {
            page: query.page,
            limit: query.limit,
            search: query.search.clone(),
            category: query.filter.0.clone(),
        };
        let page = self.client.list_products(&token, &request).await?;
        Ok(ListPage {
            items: page.products,
            total: page.pagination.total,
            pages: page.pagination.pages,
            page: query.page,
        })
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn mutate(
        &self,
        product: &Product,
        mutation: &ProductMutation,
    ) -> Result<MutationOutcome<Product>, ApiError> {
        let token = self.store.token().ok_or(ApiError::NoToken)?;
        let id: &ProductId = &product.id;
        match mutation {
            ProductMutation::ToggleAvailability => {
                self.client.toggle_product_availability(&token, id).await?;
                Ok(MutationOutcome::Replace(Product {
                    availability: !product.availability,
                    ..product.clone()
                }))
            }
            ProductMutation::ToggleBestseller => {
                self.client.toggle_product_bestseller(&token, id).await?;
                Ok(MutationOutcome::Replace(Product {
                    bestseller: !product.bestseller,
                    ..product.clone()
                }))
            }
            ProductMutation::Delete => {
                self.client.delete_product(&token, id).await?;
                Ok(MutationOutcome::Remove)
            }
        }
    }

    fn item_id(product: &Product) -> &str {
        product.id.as_str()
    }

    fn failure_message(mutation: &ProductMutation) -> &'static str {
        match mutation {
            ProductMutation::ToggleAvailability => "Failed to toggle availability",
            ProductMutation::ToggleBestseller => "Failed to toggle bestseller status",
            ProductMutation::Delete => "Failed to delete product",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_category_is_no_filter() {
        let filter = CategoryFilter::new(" F ");
        assert!(!filter.is_active());
        assert!(!filter.needs_debounce());
        assert_eq!(filter.normalized(), CategoryFilter::default());
    }

    #[test]
    fn test_category_is_trimmed() {
        let filter = CategoryFilter::new("  Fiction ");
        assert!(filter.is_active());
        assert!(filter.needs_debounce());
        assert_eq!(filter.normalized().0, "Fiction");
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            ProductSource::failure_message(&ProductMutation::ToggleBestseller),
            "Failed to toggle bestseller status"
        );
        assert_eq!(
            ProductSource::failure_message(&ProductMutation::Delete),
            "Failed to delete product"
        );
    }

    #[tokio::test]
    async fn test_fetch_without_token_is_refused() {
        let client = BackendClient::new(
            url::Url::parse("http://127.0.0.1:9/").unwrap(),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        let source = ProductSource::new(client, SessionStore::in_memory());
        let query = ListQuery {
            page: 1,
            limit: 10,
            search: String::new(),
            typed_search: String::new(),
            filter: CategoryFilter::default(),
        };
        assert!(matches!(source.fetch(&query).await, Err(ApiError::NoToken)));
    }
}
