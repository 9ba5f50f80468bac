//! Shared helpers for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Results page with two well-formed listings and one non-product slot
pub const TWO_PRODUCT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="s-main-slot">
  <div role="listitem" data-asin="B0AAA" data-component-type="s-search-result">
    <img class="s-image" src="https://m.media-amazon.com/images/I/samsung.jpg">
    <h2 class="a-size-mini"><span>Notebook Samsung Galaxy Book4</span></h2>
    <span class="a-icon-alt">4,6 de 5 estrelas</span>
    <div data-cy="reviews-block"><span class="a-size-base s-underline-text">1.234</span></div>
  </div>
  <div role="listitem" data-asin="">
    <h2><span>Sponsored banner</span></h2>
  </div>
  <div role="listitem" data-asin="B0BBB" data-component-type="s-search-result">
    <img class="s-image" src="/images/I/asus.jpg">
    <h2><span>Notebook Asus Vivobook 15</span></h2>
  </div>
</div>
</body></html>"#;

/// Canned answer of the stub origin
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn html(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self {
            content_type: "application/json",
            ..Self::html(status, body)
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Minimal HTTP/1.1 server answering every request with one canned response
pub struct StubOrigin {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubOrigin {
    pub async fn start(response: StubResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub origin");
        let addr = listener.local_addr().expect("stub origin address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let response = response.clone();
                let recorded = Arc::clone(&recorded);

                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        head.extend_from_slice(&chunk[..n]);
                        if head.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    recorded
                        .lock()
                        .expect("request log")
                        .push(String::from_utf8_lossy(&head).into_owned());

                    tokio::time::sleep(response.delay).await;

                    let payload = format!(
                        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        response.status,
                        reason(response.status),
                        response.content_type,
                        response.body.len(),
                        response.body
                    );
                    let _ = socket.write_all(payload.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    /// Raw request heads received so far, header names lowercased
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request log")
            .iter()
            .map(|head| head.to_lowercase())
            .collect()
    }
}

impl Drop for StubOrigin {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

/// Address nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}")
}
