//! Local input validation.
//!
//! Everything here runs before any request is made. A failed check never
//! reaches the backend; its message is shown inline instead.
//!
//! Products can be entered two ways: as individual form fields
//! ([`ProductForm`]) or as one pasted JSON object ([`ProductDraft::from_json`]).
//! Both produce a [`ProductDraft`], which is what the add endpoint takes.
//! Edits go through [`ProductChanges`], where every field is optional.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;

use hadi_books_core::Price;

use crate::api::ApiError;

/// Largest image the backend accepts for products and profile pictures.
pub const MAX_IMAGE_BYTES: u64 = 250 * 1024;

/// Longest allowed product name, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Longest allowed product description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// A local validation failure. `Display` is the message shown to the admin.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFormFields,
    #[error(
        "Please provide all required fields (name, description, price, category, author, language)"
    )]
    MissingJsonFields,
    #[error("Product name must be 255 characters or less")]
    NameTooLong,
    #[error("Product name must be a string of 255 characters or less")]
    JsonNameInvalid,
    #[error("Description must be 1000 characters or less")]
    DescriptionTooLong,
    #[error("Description must be a string of 1000 characters or less")]
    JsonDescriptionInvalid,
    #[error("Price must be a positive number")]
    InvalidPrice,
    #[error("Original price must be a positive number")]
    InvalidOriginalPrice,
    #[error("{0} must be a non-empty string")]
    BlankField(&'static str),
    #[error("Subcategories must be an array of strings")]
    InvalidSubCategories,
    #[error("ISBN must be a string")]
    InvalidIsbn,
    #[error("{0} must be true or false")]
    InvalidFlag(&'static str),
    #[error("Invalid JSON format")]
    InvalidJson,
    #[error("Please upload an image")]
    MissingImage,
    #[error("Image size exceeds 250KB limit")]
    ImageTooLarge,
    #[error("Could not read image: {0}")]
    ImageUnreadable(String),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter a 6-digit OTP")]
    IncompleteOtp,
    #[error("Please select an image file")]
    MissingHeroImage,
    #[error(
        "Maximum limit of 10 active hero images reached. Please deactivate some images first."
    )]
    HeroLimitReached,
    #[error("{0}")]
    InvalidEmail(#[from] hadi_books_core::EmailError),
}

// =============================================================================
// Images
// =============================================================================

/// An image file ready to be sent as a multipart part.
///
/// Implements `Debug` manually so the raw bytes never end up in logs.
#[derive(Clone)]
pub struct ImageUpload {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Wrap in-memory image bytes. The content type is guessed from the
    /// file extension.
    #[must_use]
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ImageUnreadable` if the file cannot be read.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ValidationError::ImageUnreadable(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::from_bytes(file_name, bytes))
    }

    /// Reject images over [`MAX_IMAGE_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ImageTooLarge` if the image is too big.
    pub fn within_limit(self) -> Result<Self, ValidationError> {
        if self.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge);
        }
        Ok(self)
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub(crate) fn into_part(self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.content_type)?)
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Products
// =============================================================================

/// A validated new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub original_price: Option<Price>,
    pub category: String,
    pub sub_categories: Vec<String>,
    pub author: String,
    pub isbn: Option<String>,
    pub language: String,
}

/// Raw product form fields as typed by the admin.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub original_price: String,
    pub category: String,
    /// Comma-separated list.
    pub sub_categories: String,
    pub author: String,
    pub isbn: String,
    pub language: String,
}

impl ProductForm {
    /// Validate the form for a new product.
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in form order.
    pub fn validate(&self) -> Result<ProductDraft, ValidationError> {
        let required = [
            &self.name,
            &self.description,
            &self.price,
            &self.category,
            &self.author,
            &self.language,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(ValidationError::MissingFormFields);
        }
        if self.name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong);
        }
        let price = Price::parse_positive(&self.price).map_err(|_| ValidationError::InvalidPrice)?;
        let original_price = parse_optional_price(&self.original_price)?;

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            original_price,
            category: self.category.trim().to_string(),
            sub_categories: split_sub_categories(&self.sub_categories),
            author: self.author.trim().to_string(),
            isbn: non_blank(&self.isbn),
            language: self.language.trim().to_string(),
        })
    }

    /// Validate the form as an edit. Blank fields are left unchanged;
    /// filled ones go through the same checks as a new product.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate_changes(&self) -> Result<ProductChanges, ValidationError> {
        if self.name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong);
        }
        let price = parse_optional_price(&self.price).map_err(|_| ValidationError::InvalidPrice)?;
        let original_price = parse_optional_price(&self.original_price)?;
        let sub_categories = split_sub_categories(&self.sub_categories);

        Ok(ProductChanges {
            name: non_blank(&self.name),
            description: non_blank(&self.description),
            price,
            original_price,
            category: non_blank(&self.category),
            sub_categories: (!sub_categories.is_empty()).then_some(sub_categories),
            author: non_blank(&self.author),
            isbn: non_blank(&self.isbn),
            language: non_blank(&self.language),
            availability: None,
            bestseller: None,
        })
    }
}

impl ProductDraft {
    /// Parse and validate a pasted JSON product.
    ///
    /// Required fields are `name`, `description`, `price`, `category`,
    /// `author`, and `language`. `price` and `originalPrice` may be numbers
    /// or numeric strings. `subCategories` may be an array of strings or a
    /// comma-separated string.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidJson` if the text is not JSON, else
    /// the first failed check.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text).map_err(|_| ValidationError::InvalidJson)?;
        let field = |key: &str| value.get(key).filter(|v| is_truthy(v));

        let required = ["name", "description", "price", "category", "author", "language"];
        if required.iter().any(|key| field(key).is_none()) {
            return Err(ValidationError::MissingJsonFields);
        }

        let name = field("name")
            .and_then(Value::as_str)
            .filter(|s| s.chars().count() <= MAX_NAME_CHARS)
            .ok_or(ValidationError::JsonNameInvalid)?;
        let description = field("description")
            .and_then(Value::as_str)
            .filter(|s| s.chars().count() <= MAX_DESCRIPTION_CHARS)
            .ok_or(ValidationError::JsonDescriptionInvalid)?;
        let price = field("price")
            .and_then(json_price)
            .ok_or(ValidationError::InvalidPrice)?;
        let original_price = match field("originalPrice") {
            Some(v) => Some(json_price(v).ok_or(ValidationError::InvalidOriginalPrice)?),
            None => None,
        };
        let category = json_non_blank(field("category"), "Category")?;
        let author = json_non_blank(field("author"), "Author")?;
        let language = json_non_blank(field("language"), "Language")?;
        let sub_categories = match field("subCategories") {
            Some(v) => json_sub_categories(v)?,
            None => Vec::new(),
        };
        let isbn = match field("isbn") {
            Some(Value::String(s)) => non_blank(s),
            Some(_) => return Err(ValidationError::InvalidIsbn),
            None => None,
        };

        Ok(Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            price,
            original_price,
            category,
            sub_categories,
            author,
            isbn,
            language,
        })
    }

    /// Multipart body for the add endpoint, image included.
    pub(crate) fn into_form(self, image: ImageUpload) -> Result<Form, ApiError> {
        let form = ProductChanges::from(self).into_form()?;
        Ok(form.part("image", image.into_part()?))
    }
}

/// Edits to an existing product. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub original_price: Option<Price>,
    pub category: Option<String>,
    pub sub_categories: Option<Vec<String>>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub language: Option<String>,
    pub availability: Option<bool>,
    pub bestseller: Option<bool>,
}

impl ProductChanges {
    /// Parse and validate a pasted JSON edit. Every field is optional;
    /// present ones are checked like a new product's.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidJson` if the text is not a JSON
    /// object, else the first failed check.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(text).map_err(|_| ValidationError::InvalidJson)?;
        if !value.is_object() {
            return Err(ValidationError::InvalidJson);
        }
        let field = |key: &str| value.get(key).filter(|v| !v.is_null());

        let name = match field("name") {
            Some(v) => Some(
                v.as_str()
                    .filter(|s| s.chars().count() <= MAX_NAME_CHARS)
                    .ok_or(ValidationError::JsonNameInvalid)?,
            ),
            None => None,
        };
        let description = match field("description") {
            Some(v) => Some(
                v.as_str()
                    .filter(|s| s.chars().count() <= MAX_DESCRIPTION_CHARS)
                    .ok_or(ValidationError::JsonDescriptionInvalid)?,
            ),
            None => None,
        };
        let price = match field("price") {
            Some(v) => Some(json_price(v).ok_or(ValidationError::InvalidPrice)?),
            None => None,
        };
        let original_price = match field("originalPrice") {
            Some(v) => Some(json_price(v).ok_or(ValidationError::InvalidOriginalPrice)?),
            None => None,
        };
        let category = field("category")
            .map(|v| json_non_blank(Some(v), "Category"))
            .transpose()?;
        let author = field("author")
            .map(|v| json_non_blank(Some(v), "Author"))
            .transpose()?;
        let language = field("language")
            .map(|v| json_non_blank(Some(v), "Language"))
            .transpose()?;
        let sub_categories = field("subCategories").map(json_sub_categories).transpose()?;
        let isbn = match field("isbn") {
            Some(Value::String(s)) => non_blank(s),
            Some(_) => return Err(ValidationError::InvalidIsbn),
            None => None,
        };
        let availability = field("availability")
            .map(|v| v.as_bool().ok_or(ValidationError::InvalidFlag("Availability")))
            .transpose()?;
        let bestseller = field("bestseller")
            .map(|v| v.as_bool().ok_or(ValidationError::InvalidFlag("Bestseller")))
            .transpose()?;

        Ok(Self {
            name: name.and_then(non_blank),
            description: description.and_then(non_blank),
            price,
            original_price,
            category,
            sub_categories,
            author,
            isbn,
            language,
            availability,
            bestseller,
        })
    }

    /// Whether the edit would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Multipart body for the update endpoint. Sub-categories travel as a
    /// JSON-encoded string array and are omitted when empty.
    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        let text_fields = [
            ("name", self.name),
            ("description", self.description),
            ("price", self.price.map(|p| p.amount().to_string())),
            (
                "originalPrice",
                self.original_price.map(|p| p.amount().to_string()),
            ),
            ("category", self.category),
            ("author", self.author),
            ("isbn", self.isbn),
            ("language", self.language),
            ("availability", self.availability.map(|b| b.to_string())),
            ("bestseller", self.bestseller.map(|b| b.to_string())),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                form = form.text(key, value);
            }
        }
        if let Some(sub_categories) = self.sub_categories.filter(|s| !s.is_empty()) {
            form = form.text("subCategories", serde_json::to_string(&sub_categories)?);
        }
        Ok(form)
    }
}

impl From<ProductDraft> for ProductChanges {
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            price: Some(draft.price),
            original_price: draft.original_price,
            category: Some(draft.category),
            sub_categories: Some(draft.sub_categories),
            author: Some(draft.author),
            isbn: draft.isbn,
            language: Some(draft.language),
            availability: None,
            bestseller: None,
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
#[must_use]
pub fn split_sub_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_optional_price(raw: &str) -> Result<Option<Price>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    Price::parse_positive(raw)
        .map(Some)
        .map_err(|_| ValidationError::InvalidOriginalPrice)
}

/// JavaScript truthiness, which is what the backend's own form handling
/// uses for "was this field provided".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_price(value: &Value) -> Option<Price> {
    match value {
        Value::Number(n) => Price::parse_positive(&n.to_string()).ok(),
        Value::String(s) => Price::parse_positive(s).ok(),
        _ => None,
    }
}

fn json_non_blank(value: Option<&Value>, label: &'static str) -> Result<String, ValidationError> {
    value
        .and_then(Value::as_str)
        .and_then(non_blank)
        .ok_or(ValidationError::BlankField(label))
}

fn json_sub_categories(value: &Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or(ValidationError::InvalidSubCategories)
            })
            .filter(|item| item.as_ref().map_or(true, |s| !s.is_empty()))
            .collect(),
        Value::String(raw) => Ok(split_sub_categories(raw)),
        _ => Err(ValidationError::InvalidSubCategories),
    }
}

// =============================================================================
// Passwords
// =============================================================================

/// Check that a new password and its confirmation match exactly.
///
/// # Errors
///
/// Returns `ValidationError::PasswordMismatch` if they differ.
pub fn confirm_password(
    new_password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), ValidationError> {
    if new_password.expose_secret() != confirm_password.expose_secret() {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_form() -> ProductForm {
        ProductForm {
            name: "Aab-e-Hayat".to_string(),
            description: "Umera Ahmed's novel".to_string(),
            price: "1450".to_string(),
            original_price: String::new(),
            category: "Fiction".to_string(),
            sub_categories: " Urdu, , Novel ".to_string(),
            author: "Umera Ahmed".to_string(),
            isbn: String::new(),
            language: "Urdu".to_string(),
        }
    }

    #[test]
    fn test_form_valid() {
        let draft = filled_form().validate().unwrap();
        assert_eq!(draft.sub_categories, vec!["Urdu", "Novel"]);
        assert_eq!(draft.isbn, None);
        assert_eq!(draft.original_price, None);
    }

    #[test]
    fn test_form_missing_required() {
        let form = ProductForm {
            author: "  ".to_string(),
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingFormFields));
    }

    #[test]
    fn test_form_name_too_long() {
        let form = ProductForm {
            name: "x".repeat(256),
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::NameTooLong));

        let form = ProductForm {
            name: "x".repeat(255),
            ..filled_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_form_description_too_long() {
        let form = ProductForm {
            description: "d".repeat(1001),
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::DescriptionTooLong));
    }

    #[test]
    fn test_form_bad_prices() {
        let form = ProductForm {
            price: "-1".to_string(),
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::InvalidPrice));

        let form = ProductForm {
            original_price: "abc".to_string(),
            ..filled_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::InvalidOriginalPrice));
    }

    #[test]
    fn test_form_changes_skip_blank_fields() {
        let form = ProductForm {
            price: "999".to_string(),
            ..ProductForm::default()
        };
        let changes = form.validate_changes().unwrap();
        assert_eq!(changes.price, Some(Price::parse_positive("999").unwrap()));
        assert_eq!(changes.name, None);
        assert_eq!(changes.sub_categories, None);
    }

    #[test]
    fn test_json_valid() {
        let json = r#"{
            "name": "Book Name",
            "description": "Book description...",
            "price": 19.99,
            "originalPrice": "24.99",
            "category": "Fiction",
            "subCategories": ["Novel", "Adventure"],
            "author": "Author Name",
            "isbn": "1234567890",
            "language": "English"
        }"#;
        let draft = ProductDraft::from_json(json).unwrap();
        assert_eq!(draft.price.to_string(), "Rs. 19.99");
        assert_eq!(draft.original_price.unwrap().to_string(), "Rs. 24.99");
        assert_eq!(draft.sub_categories, vec!["Novel", "Adventure"]);
        assert_eq!(draft.isbn.as_deref(), Some("1234567890"));
    }

    #[test]
    fn test_json_invalid_syntax() {
        assert_eq!(
            ProductDraft::from_json("{name: oops"),
            Err(ValidationError::InvalidJson)
        );
    }

    #[test]
    fn test_json_missing_required() {
        let json = r#"{"name": "A", "description": "B", "price": 0, "category": "C", "author": "D", "language": "E"}"#;
        assert_eq!(
            ProductDraft::from_json(json),
            Err(ValidationError::MissingJsonFields)
        );
    }

    #[test]
    fn test_json_name_must_be_string() {
        let json = r#"{"name": 42, "description": "B", "price": 10, "category": "C", "author": "D", "language": "E"}"#;
        assert_eq!(
            ProductDraft::from_json(json),
            Err(ValidationError::JsonNameInvalid)
        );
    }

    #[test]
    fn test_json_sub_categories_must_be_array_of_strings() {
        let json = r#"{"name": "A", "description": "B", "price": 10, "category": "C", "author": "D", "language": "E", "subCategories": {"a": 1}}"#;
        assert_eq!(
            ProductDraft::from_json(json),
            Err(ValidationError::InvalidSubCategories)
        );

        let json = r#"{"name": "A", "description": "B", "price": 10, "category": "C", "author": "D", "language": "E", "subCategories": ["ok", 3]}"#;
        assert_eq!(
            ProductDraft::from_json(json),
            Err(ValidationError::InvalidSubCategories)
        );
    }

    #[test]
    fn test_json_blank_category() {
        let json = r#"{"name": "A", "description": "B", "price": 10, "category": "   ", "author": "D", "language": "E"}"#;
        assert_eq!(
            ProductDraft::from_json(json),
            Err(ValidationError::BlankField("Category"))
        );
        assert_eq!(
            ValidationError::BlankField("Category").to_string(),
            "Category must be a non-empty string"
        );
    }

    #[test]
    fn test_changes_from_json() {
        let changes =
            ProductChanges::from_json(r#"{"price": "500", "bestseller": true, "isbn": null}"#)
                .unwrap();
        assert_eq!(changes.price, Some(Price::parse_positive("500").unwrap()));
        assert_eq!(changes.bestseller, Some(true));
        assert_eq!(changes.isbn, None);
        assert!(!changes.is_empty());

        assert_eq!(
            ProductChanges::from_json(r#"{"availability": "yes"}"#),
            Err(ValidationError::InvalidFlag("Availability"))
        );
        assert_eq!(
            ProductChanges::from_json("[1, 2]"),
            Err(ValidationError::InvalidJson)
        );
    }

    #[test]
    fn test_image_limit() {
        let exact = ImageUpload::from_bytes("cover.jpg", vec![0; 250 * 1024]);
        assert!(exact.within_limit().is_ok());

        let over = ImageUpload::from_bytes("cover.jpg", vec![0; 250 * 1024 + 1]);
        assert_eq!(
            over.within_limit().unwrap_err(),
            ValidationError::ImageTooLarge
        );
    }

    #[test]
    fn test_image_content_type_guess() {
        assert_eq!(ImageUpload::from_bytes("a.PNG", vec![1]).content_type(), "image/png");
        assert_eq!(ImageUpload::from_bytes("a.jpeg", vec![1]).content_type(), "image/jpeg");
        assert_eq!(
            ImageUpload::from_bytes("noext", vec![1]).content_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_image_debug_omits_bytes() {
        let image = ImageUpload::from_bytes("a.png", vec![7; 4]);
        let debug = format!("{image:?}");
        assert!(debug.contains("len: 4"));
    }

    #[tokio::test]
    async fn test_image_read_missing_file() {
        let err = ImageUpload::read("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, ValidationError::ImageUnreadable(_)));
    }

    #[test]
    fn test_confirm_password() {
        let a = SecretString::from("hunter22");
        let b = SecretString::from("hunter22");
        let c = SecretString::from("hunter23");
        assert!(confirm_password(&a, &b).is_ok());
        assert_eq!(
            confirm_password(&a, &c),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_split_sub_categories() {
        assert_eq!(split_sub_categories("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_sub_categories("  ").is_empty());
    }
}
