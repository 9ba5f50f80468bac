//! Consumer side of the search API
//!
//! [`SearchClient`] calls a running service and decodes its envelope;
//! [`render_cards`] turns the result into plain text cards for a terminal.

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::product::{Product, SearchResult};

/// Default endpoint of a locally running service
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/scrape";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The query was empty after trimming
    #[error("Please, type a product name to search")]
    EmptyQuery,

    /// The service answered with a non-success status
    #[error("Search failed: {status} - {body}")]
    Status { status: u16, body: String },

    /// Transport or decoding failure
    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// HTTP client for the `/api/scrape` endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    api_url: String,
}

impl SearchClient {
    /// Create a client for the endpoint at `api_url`
    pub fn new(api_url: impl Into<String>) -> Result<Self, ClientError> {
        // Leaves room for the service's own origin budget
        let client = ClientBuilder::new().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Search for `query`.
    ///
    /// Any non-2xx answer is a failure carrying the status and the raw body.
    pub async fn search(&self, query: &str) -> Result<SearchResult, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::EmptyQuery);
        }

        debug!("Searching {} for '{}'", self.api_url, query);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("keyword", query)])
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Search failed with status {}: {}", status.as_u16(), body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<SearchResult>().await?)
    }
}

/// Render a result as text cards, one per product
pub fn render_cards(result: &SearchResult) -> String {
    if result.products.is_empty() {
        return "No products found for your search\n".to_string();
    }

    let total = result.total_products;
    let mut out = format!(
        "{} product{} found for \"{}\"\n",
        total,
        if total == 1 { "" } else { "s" },
        result.keyword
    );

    for (index, product) in result.products.iter().enumerate() {
        out.push('\n');
        render_card(&mut out, index + 1, product);
    }

    out
}

fn render_card(out: &mut String, position: usize, product: &Product) {
    let or = |value: &str, fallback: &'static str| {
        if value.is_empty() { fallback.to_string() } else { value.to_string() }
    };

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}. {}", position, or(&product.title, "No title"));
    let _ = writeln!(out, "   ⭐ {}", or(&product.rating, "No rating"));
    let _ = writeln!(out, "   {} reviews", or(&product.review_count, "0"));
    if !product.image.is_empty() {
        let _ = writeln!(out, "   {}", product.image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn result(products: Vec<Product>) -> SearchResult {
        SearchResult::new("notebook", products, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_render_full_card() {
        let rendered = render_cards(&result(vec![Product {
            title: "Notebook Lenovo IdeaPad".to_string(),
            rating: "4,5 de 5 estrelas".to_string(),
            review_count: "1234".to_string(),
            image: "https://m.media-amazon.com/images/I/a.jpg".to_string(),
        }]));

        assert_eq!(
            rendered,
            "1 product found for \"notebook\"\n\
             \n\
             1. Notebook Lenovo IdeaPad\n   \
             ⭐ 4,5 de 5 estrelas\n   \
             1234 reviews\n   \
             https://m.media-amazon.com/images/I/a.jpg\n"
        );
    }

    #[test]
    fn test_render_fallbacks() {
        let rendered = render_cards(&result(vec![
            Product {
                image: "https://m.media-amazon.com/images/I/b.jpg".to_string(),
                ..Product::default()
            },
            Product {
                title: "Mouse".to_string(),
                ..Product::default()
            },
        ]));

        assert!(rendered.starts_with("2 products found for \"notebook\"\n"));
        assert!(rendered.contains("1. No title\n   ⭐ No rating\n   0 reviews\n"));
        assert!(rendered.ends_with("2. Mouse\n   ⭐ No rating\n   0 reviews\n"));
    }

    #[test]
    fn test_render_empty_result() {
        assert_eq!(render_cards(&result(vec![])), "No products found for your search\n");
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_locally() {
        let client = SearchClient::new("http://127.0.0.1:9/api/scrape").unwrap();
        assert!(matches!(client.search("   ").await, Err(ClientError::EmptyQuery)));
    }

    #[test]
    fn test_status_error_message() {
        let err = ClientError::Status {
            status: 503,
            body: "{\"error\":\"blocked\"}".to_string(),
        };
        assert_eq!(err.to_string(), "Search failed: 503 - {\"error\":\"blocked\"}");
    }
}
