//! HTTP surface
//!
//! `GET /api/scrape?keyword=<text>` runs one search and answers with the
//! [`SearchResult`](crate::domain::SearchResult) envelope. Failures map to
//! a status code and a small JSON body with `error` plus either `example`
//! (bad request) or `details`.

use actix_web::http::StatusCode;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, ResponseError, get, options, web};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::search_service::{ScrapeError, SearchService};
use crate::infrastructure::config::AppConfig;

/// Example shown to callers that forget the keyword
pub const EXAMPLE_REQUEST: &str = "/api/scrape?keyword=notebook";

#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    pub keyword: Option<String>,
}

/// JSON body of every failed request
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn with_details(error: &str, details: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            example: None,
            details: Some(details.into()),
        }
    }
}

impl From<&ScrapeError> for ErrorBody {
    fn from(error: &ScrapeError) -> Self {
        match error {
            ScrapeError::MissingKeyword => Self {
                error: error.to_string(),
                example: Some(EXAMPLE_REQUEST.to_string()),
                details: None,
            },
            ScrapeError::Blocked => {
                Self::with_details("Amazon blocked the request. Try again later.", "Service unavailable")
            }
            ScrapeError::Timeout(_) => {
                Self::with_details("Request timeout", "The request took too long to complete")
            }
            ScrapeError::Upstream { .. } | ScrapeError::Network(_) => {
                Self::with_details("Failed to scrape Amazon", error.to_string())
            }
        }
    }
}

impl ResponseError for ScrapeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingKeyword => StatusCode::BAD_REQUEST,
            Self::Blocked => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { .. } | Self::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::from(self))
    }
}

#[get("/api/scrape")]
async fn scrape(
    service: web::Data<SearchService>,
    query: web::Query<ScrapeQuery>,
) -> Result<HttpResponse, ScrapeError> {
    let result = service.search(query.keyword.as_deref()).await?;
    info!("Returning {} products for '{}'", result.total_products, result.keyword);
    Ok(HttpResponse::Ok().json(result))
}

#[options("/api/scrape")]
async fn scrape_preflight() -> impl Responder {
    HttpResponse::NoContent().finish()
}

#[get("/healthz")]
async fn healthz() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Register the routes; the app must carry a `web::Data<SearchService>`
pub fn configure(cfg: &mut web::ServiceConfig) {
    // An unreadable query string gets the same answer as a missing keyword
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        warn!("Rejecting query string: {}", err);
        actix_web::Error::from(ScrapeError::MissingKeyword)
    });

    cfg.app_data(query_config)
        .service(scrape)
        .service(scrape_preflight)
        .service(healthz);
}

/// CORS response headers for `origin`; no headers when it is unset
pub fn cors_headers(origin: Option<&str>) -> DefaultHeaders {
    match origin {
        Some(origin) => DefaultHeaders::new()
            .add(("Access-Control-Allow-Origin", origin.to_string()))
            .add(("Access-Control-Allow-Methods", "GET, OPTIONS"))
            .add(("Access-Control-Allow-Headers", "Content-Type")),
        None => DefaultHeaders::new(),
    }
}

/// Bind and serve until shutdown
pub async fn run_server(config: AppConfig) -> Result<()> {
    let service = web::Data::new(SearchService::from_config(&config.scraper)?);
    let cors_origin = config.server.cors_origin.clone();
    let (host, port) = config.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(cors_headers(cors_origin.as_deref()))
            .configure(configure)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {host}:{port}"))?
    .run();

    info!("Server running on http://localhost:{}", port);
    info!("Try: http://localhost:{}{}", port, EXAMPLE_REQUEST);

    server.await.context("HTTP server stopped with an error")?;
    info!("Server shut down");
    Ok(())
}
