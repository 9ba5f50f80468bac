//! Product extraction for a single search listing slot
//!
//! A slot only becomes a [`Product`] when it carries a title or a thumbnail;
//! sponsored placeholders, separators and layout artifacts match the slot
//! fingerprint too but have neither. Missing fields degrade to empty strings.

use scraper::{ElementRef, Selector};
use tracing::{debug, warn};
use url::Url;

use super::config::ListingSelectors;
use super::normalize::{clean_text, element_text, extract_numeric_count};
use super::{ParsingError, ParsingResult};
use crate::domain::product::Product;

/// Extracts normalized product records from listing slot elements
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    title_selector: Selector,
    rating_selector: Selector,
    image_selector: Selector,
    review_count_selector: Selector,
    /// Base for resolving thumbnail sources
    base_url: Url,
}

impl ProductExtractor {
    /// Create an extractor with the default listing selectors
    pub fn new(base_url: &str) -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default(), base_url)
    }

    /// Create an extractor with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors, base_url: &str) -> ParsingResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ParsingError::url_resolution_failed(base_url, format!("Invalid base URL: {e}"), None))?;

        Ok(Self {
            title_selector: compile_selector(&selectors.title)?,
            rating_selector: compile_selector(&selectors.rating)?,
            image_selector: compile_selector(&selectors.image)?,
            review_count_selector: compile_selector(&selectors.review_count)?,
            base_url,
        })
    }

    /// Extract a product from one slot.
    ///
    /// `None` means the slot has neither a title nor a thumbnail; any other
    /// slot yields a product, with unreadable fields left empty.
    pub fn extract(&self, node: ElementRef<'_>) -> Option<Product> {
        let title_element = node.select(&self.title_selector).next();
        let rating_element = node.select(&self.rating_selector).next();
        let image_element = node.select(&self.image_selector).next();
        let review_count_element = node.select(&self.review_count_selector).next();

        if title_element.is_none() && image_element.is_none() {
            debug!(
                "Skipping slot {:?}: no title or image",
                node.value().attr("data-asin").unwrap_or_default()
            );
            return None;
        }

        let review_count = review_count_element
            .map(|el| extract_numeric_count(&clean_text(Some(&element_text(el)))))
            .unwrap_or_default();

        let image = image_element
            .and_then(|el| el.value().attr("src"))
            .map(|src| self.resolve_image_url(src))
            .unwrap_or_default();

        Some(Product {
            title: clean_text(title_element.map(element_text).as_deref()),
            rating: clean_text(rating_element.map(element_text).as_deref()),
            review_count,
            image,
        })
    }

    /// Resolve a thumbnail `src` against the site base URL, keeping the raw
    /// value when it cannot be resolved
    fn resolve_image_url(&self, src: &str) -> String {
        let src = src.trim();
        if src.is_empty() {
            return String::new();
        }

        match self.base_url.join(src) {
            Ok(url) => url.into(),
            Err(e) => {
                let err = ParsingError::url_resolution_failed(src, e, Some(self.base_url.as_str()));
                warn!("Keeping unresolved image source: {}", err);
                src.to_string()
            }
        }
    }
}

/// Compile one selector (or selector group)
pub(crate) fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}
