//! Document fetcher for search result pages
//!
//! Issues a single GET per keyword with a desktop-browser header set and a
//! fixed wait budget, and classifies failures so the API layer can tell an
//! anti-bot rejection apart from a slow origin or a broken connection.
//! Retries are left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, DNT, HeaderMap, HeaderValue,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{Client, ClientBuilder, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infrastructure::config::ScraperConfig;

/// Classified outcome of a failed fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The origin did not answer within the wait budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The origin answered 503, its anti-scraping response
    #[error("Origin blocked the request (HTTP 503)")]
    Blocked,

    /// Any other non-success status
    #[error("Request failed with status code {status}")]
    Status { status: u16 },

    /// Transport-level failure
    #[error("{0}")]
    Network(String),
}

/// Source of raw search result markup
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the results page for `keyword`
    async fn fetch(&self, keyword: &str) -> Result<String, FetchError>;
}

/// Configuration for the outbound HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Site root, e.g. `https://www.amazon.com.br`
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    /// Wait budget for the whole request, body included
    pub timeout: Duration,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from ScraperConfig
    pub fn from_scraper_config(scraper_config: &ScraperConfig) -> Self {
        Self {
            base_url: scraper_config.base_url.clone(),
            user_agent: scraper_config.user_agent.clone(),
            accept_language: scraper_config.accept_language.clone(),
            timeout: Duration::from_secs(scraper_config.timeout_seconds),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_scraper_config(&ScraperConfig::default())
    }
}

/// reqwest-backed [`DocumentFetcher`]
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: Client,
    config: HttpClientConfig,
}

impl HttpDocumentFetcher {
    /// Create a new fetcher with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .default_headers(Self::browser_headers(&config)?)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Header set of a desktop Chrome on Windows; bare clients get rejected far more often
    fn browser_headers(config: &HttpClientConfig) -> Result<HeaderMap, FetchError> {
        let header = |value: &str| {
            HeaderValue::from_str(value)
                .map_err(|e| FetchError::Network(format!("Invalid header value '{value}': {e}")))
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header(&config.user_agent)?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, header(&config.accept_language)?);
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        Ok(headers)
    }

    /// Search page URL for `keyword`
    pub fn search_url(&self, keyword: &str) -> String {
        format!(
            "{}/s?k={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(keyword)
        )
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!("Origin answered 503 for {}", url);
            return Err(FetchError::Blocked);
        }
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, keyword: &str) -> Result<String, FetchError> {
        let url = self.search_url(keyword);
        info!("Fetching URL: {}", url);

        // Guards body streaming as well, in case the client timer is not hit first
        match tokio::time::timeout(self.config.timeout, self.get_text(&url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.config.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base_url: &str) -> HttpDocumentFetcher {
        HttpDocumentFetcher::new(HttpClientConfig {
            base_url: base_url.to_string(),
            ..HttpClientConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.base_url, "https://www.amazon.com.br");
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_search_url_encodes_keyword() {
        let fetcher = fetcher("https://www.amazon.com.br/");

        assert_eq!(fetcher.search_url("notebook"), "https://www.amazon.com.br/s?k=notebook");
        assert_eq!(
            fetcher.search_url("fone de ouvido & cabo"),
            "https://www.amazon.com.br/s?k=fone%20de%20ouvido%20%26%20cabo"
        );
        assert_eq!(fetcher.search_url("ação"), "https://www.amazon.com.br/s?k=a%C3%A7%C3%A3o");
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..HttpClientConfig::default()
        };
        assert!(matches!(HttpDocumentFetcher::new(config), Err(FetchError::Network(_))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::Status { status: 404 }.to_string(),
            "Request failed with status code 404"
        );
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(10)).to_string(),
            "Request timed out after 10s"
        );
    }
}
