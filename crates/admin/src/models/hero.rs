//! Storefront hero carousel images.

use serde::{Deserialize, Serialize};

use hadi_books_core::HeroImageId;

/// A carousel image shown on the storefront home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImage {
    pub id: HeroImageId,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl HeroImage {
    /// Alt text, or a placeholder when none was provided.
    #[must_use]
    pub fn alt_text_or_placeholder(&self) -> &str {
        self.alt_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or("No alt text provided")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hero_image() {
        let json = r#"{"id":"h1","imageUrl":"https://cdn/h1.jpg","altText":"","isActive":true}"#;
        let image: HeroImage = serde_json::from_str(json).unwrap();
        assert!(image.is_active);
        assert_eq!(image.alt_text_or_placeholder(), "No alt text provided");
    }
}
