//! HTML parsing infrastructure for search listing pages
//!
//! Field normalization, per-slot product extraction and whole-page scanning,
//! built on `scraper` CSS selectors compiled once per parser.

pub mod config;
pub mod error;
pub mod listing_scanner;
pub mod normalize;
pub mod product_extractor;

// Re-export public types
pub use config::ListingSelectors;
pub use error::{ParsingError, ParsingResult};
pub use listing_scanner::ListingScanner;
pub use normalize::{clean_text, extract_numeric_count};
pub use product_extractor::ProductExtractor;
