//! Keyword search use case
//!
//! One call runs the whole pipeline for a request: validate the keyword,
//! fetch the results page once, scan it, and wrap the products in a
//! [`SearchResult`]. Nothing is shared between calls apart from the
//! read-only collaborators.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{error, info};

use crate::domain::product::SearchResult;
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::http_client::{DocumentFetcher, FetchError, HttpClientConfig, HttpDocumentFetcher};
use crate::infrastructure::parsing::ListingScanner;

/// Failure of one search request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// Missing or empty keyword; the caller can fix the request
    #[error("Keyword parameter is required")]
    MissingKeyword,

    /// The origin's anti-bot defense answered
    #[error("Origin blocked the request (HTTP 503)")]
    Blocked,

    /// The origin did not answer within the wait budget
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The origin answered with an unexpected status
    #[error("Request failed with status code {status}")]
    Upstream { status: u16 },

    /// Transport failure
    #[error("{0}")]
    Network(String),
}

impl From<FetchError> for ScrapeError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Blocked => Self::Blocked,
            FetchError::Timeout(budget) => Self::Timeout(budget),
            FetchError::Status { status } => Self::Upstream { status },
            FetchError::Network(message) => Self::Network(message),
        }
    }
}

/// Search pipeline with explicit collaborators
#[derive(Clone)]
pub struct SearchService {
    fetcher: Arc<dyn DocumentFetcher>,
    scanner: ListingScanner,
}

impl SearchService {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, scanner: ListingScanner) -> Self {
        Self { fetcher, scanner }
    }

    /// Build the HTTP-backed pipeline from scraper settings
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        let fetcher = HttpDocumentFetcher::new(HttpClientConfig::from_scraper_config(config))
            .context("Failed to create document fetcher")?;
        let scanner = ListingScanner::with_config(&config.selectors, &config.base_url)
            .context("Failed to create listing scanner")?;

        Ok(Self::new(Arc::new(fetcher), scanner))
    }

    /// Run one search.
    ///
    /// The keyword is echoed back exactly as given. A page with no
    /// recognizable listings is a successful, empty result.
    pub async fn search(&self, keyword: Option<&str>) -> Result<SearchResult, ScrapeError> {
        let keyword = keyword.filter(|k| !k.is_empty()).ok_or(ScrapeError::MissingKeyword)?;

        info!("Scraping for keyword: {}", keyword);

        let markup = self.fetcher.fetch(keyword).await.map_err(|e| {
            error!("Scraping error for '{}': {}", keyword, e);
            ScrapeError::from(e)
        })?;

        let products = self.scanner.scan(&markup);
        Ok(SearchResult::captured_now(keyword, products))
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("scanner", &self.scanner)
            .finish_non_exhaustive()
    }
}
