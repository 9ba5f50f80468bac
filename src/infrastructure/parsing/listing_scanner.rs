//! Search listing scanner
//!
//! Parses a fetched results page, selects every product slot by its
//! structural fingerprint and runs the [`ProductExtractor`] over each one.
//! Output order is document order; slots that yield nothing are dropped
//! without disturbing the order of the rest.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::ParsingResult;
use super::config::ListingSelectors;
use super::product_extractor::{ProductExtractor, compile_selector};
use crate::domain::product::Product;

/// Scanner for search result pages
#[derive(Debug, Clone)]
pub struct ListingScanner {
    container_selector: Selector,
    item_id_attribute: String,
    extractor: ProductExtractor,
}

impl ListingScanner {
    /// Create a scanner with the default listing selectors
    pub fn new(base_url: &str) -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default(), base_url)
    }

    /// Create a scanner with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors, base_url: &str) -> ParsingResult<Self> {
        Ok(Self {
            container_selector: compile_selector(&selectors.product_container)?,
            item_id_attribute: selectors.item_id_attribute.clone(),
            extractor: ProductExtractor::with_config(selectors, base_url)?,
        })
    }

    /// Parse `markup` and extract every product it lists.
    ///
    /// Malformed markup is parsed leniently; an empty vector means the page
    /// had no recognizable listings, which is not an error.
    pub fn scan(&self, markup: &str) -> Vec<Product> {
        let document = Html::parse_document(markup);
        self.scan_document(&document)
    }

    /// Extract products from an already parsed document
    pub fn scan_document(&self, document: &Html) -> Vec<Product> {
        let candidates: Vec<ElementRef<'_>> = document
            .select(&self.container_selector)
            .filter(|element| self.has_item_id(*element))
            .collect();

        info!("Found {} product elements", candidates.len());

        let products: Vec<Product> = candidates
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| {
                let product = self.extractor.extract(element);
                if product.is_none() {
                    debug!("No product extracted from slot {}", index);
                }
                product
            })
            .collect();

        info!("Extracted {} products", products.len());
        products
    }

    fn has_item_id(&self, element: ElementRef<'_>) -> bool {
        element
            .value()
            .attr(&self.item_id_attribute)
            .is_some_and(|id| !id.is_empty())
    }
}
