//! Catalog product records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hadi_books_core::{Price, ProductId};

const fn default_true() -> bool {
    true
}

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_categories: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Whether the book is listed as in stock.
    #[serde(default = "default_true")]
    pub availability: bool,
    #[serde(default)]
    pub bestseller: bool,
    #[serde(default)]
    pub reviews: Vec<ProductReview>,
}

impl Product {
    /// Reviews sorted newest first. Undated reviews sort last.
    #[must_use]
    pub fn reviews_newest_first(&self) -> Vec<&ProductReview> {
        let mut reviews: Vec<&ProductReview> = self.reviews.iter().collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    /// Star rating out of 5.
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductReview {
    /// Reviewer name, or `Anonymous`.
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|user| user.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_minimal_product() {
        let json = r#"{"id":"p1","name":"Peer-e-Kamil","price":1250}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert!(product.availability);
        assert!(!product.bestseller);
        assert!(product.sub_categories.is_empty());
        assert_eq!(product.price.to_string(), "Rs. 1250.00");
    }

    #[test]
    fn test_decode_full_product() {
        let json = r#"{
            "id": 17,
            "name": "Raja Gidh",
            "description": "Novel",
            "price": "899.5",
            "originalPrice": 1100,
            "category": "Fiction",
            "subCategories": ["Urdu", "Classic"],
            "author": "Bano Qudsia",
            "isbn": "9789694940000",
            "language": "Urdu",
            "image": "https://cdn.hadibooks.pk/raja-gidh.jpg",
            "availability": false,
            "bestseller": true
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "17");
        assert!(!product.availability);
        assert!(product.bestseller);
        assert_eq!(product.sub_categories, vec!["Urdu", "Classic"]);
        assert_eq!(product.original_price.unwrap().to_string(), "Rs. 1100.00");
    }

    #[test]
    fn test_reviews_newest_first() {
        let json = r#"{
            "id": "p1", "name": "Book", "price": 10,
            "reviews": [
                {"rating": 3, "createdAt": "2025-01-01T00:00:00Z"},
                {"rating": 5, "createdAt": "2025-03-01T00:00:00Z", "user": {"name": "Ayesha"}},
                {"rating": 4}
            ]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        let ratings: Vec<u8> = product.reviews_newest_first().iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 3, 4]);
        assert_eq!(product.reviews_newest_first()[0].author_name(), "Ayesha");
        assert_eq!(product.reviews_newest_first()[2].author_name(), "Anonymous");
    }
}
