//! Parsing configuration for listing extraction
//!
//! Centralized CSS selectors for the search results layout. Each entry may be
//! a selector group (`a, b`); the first element matching any member of the
//! group, in document order, wins.

use serde::{Deserialize, Serialize};

/// CSS selectors for search listing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One product slot: role=listitem carrying an item identifier
    pub product_container: String,

    /// Attribute holding the item identifier; slots where it is empty are skipped
    pub item_id_attribute: String,

    /// Product title, sized heading first, any heading span as fallback
    pub title: String,

    /// Icon label whose text is the rating phrase
    pub rating: String,

    /// Primary listing thumbnail
    pub image: String,

    /// Underlined count inside the reviews block
    pub review_count: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_container: r#"div[role="listitem"][data-asin]"#.to_string(),
            item_id_attribute: "data-asin".to_string(),
            title: "h2.a-size-mini span, h2 span".to_string(),
            rating: "span.a-icon-alt".to_string(),
            image: "img.s-image".to_string(),
            review_count: r#"div[data-cy="reviews-block"] span.a-size-base.s-underline-text"#.to_string(),
        }
    }
}
