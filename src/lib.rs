//! Product Scout - keyword search over e-commerce listing pages
//!
//! A search runs through four layers:
//! - `infrastructure` fetches the results page and parses product slots
//! - `application` validates the keyword and drives one fetch and scan
//! - `api` serves the pipeline over HTTP
//! - `client` consumes that API and renders text cards

// Module declarations
pub mod api;
pub mod application;
pub mod client;
pub mod domain;
pub mod infrastructure;

// Re-export the types most callers need
pub use application::{ScrapeError, SearchService};
pub use client::{ClientError, SearchClient, render_cards};
pub use domain::{Product, SearchResult};
