//! Infrastructure layer for HTML parsing, outbound HTTP and process setup
//!
//! This module provides listing parsing, the document fetcher, configuration
//! loading and logging initialization.

pub mod config; // Configuration defaults and loading
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod parsing; // Listing parsing and field normalization
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig, ScraperConfig, ServerConfig};
pub use http_client::{DocumentFetcher, FetchError, HttpClientConfig, HttpDocumentFetcher};
pub use logging::{init_logging_with_config, log_system_info};
pub use parsing::{ListingScanner, ListingSelectors, ParsingError, ParsingResult, ProductExtractor};
