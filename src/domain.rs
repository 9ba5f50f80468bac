//! Domain module - search result entities
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod product;

pub use product::{Product, SearchResult};
