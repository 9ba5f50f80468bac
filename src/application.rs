//! Application layer - use cases over the domain and infrastructure

pub mod search_service;

pub use search_service::{ScrapeError, SearchService};
