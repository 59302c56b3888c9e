//! Page fetching over HTTP.
//!
//! [`FetchPage`] is the seam between the crawl loop and the network: the loop
//! only needs "give me the payload for this request", which lets tests drive it
//! with scripted payloads. [`HttpFetcher`] is the real implementation.
//!
//! A fetch is a single attempt. There is no retry and no backoff; the first
//! failure is returned to the caller as-is.

use crate::dialect::Dialect;
use crate::error::CrawlError;
use crate::request::PageRequest;
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Something that turns a [`PageRequest`] into a parsed page payload.
pub trait FetchPage {
    async fn fetch(&self, request: &PageRequest) -> Result<Value, CrawlError>;
}

/// Fetches pages with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    dialect: Dialect,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, timeout: Duration, dialect: Dialect) -> Self {
        Self {
            client,
            timeout,
            dialect,
        }
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(page = request.page, url = %request.url))]
    async fn fetch(&self, request: &PageRequest) -> Result<Value, CrawlError> {
        let page = request.page;
        let t0 = Instant::now();

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| CrawlError::Transport { page, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Unexpected status code");
            return Err(CrawlError::HttpStatus {
                page,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CrawlError::Transport { page, source })?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Received page body"
        );

        parse_payload(page, &body, self.dialect)
    }
}

/// Parse a page body and check its success flag.
///
/// # Arguments
///
/// * `page` - Page index, used only to label errors
/// * `body` - Raw response bytes
/// * `dialect` - Decides which success flags are checked
///
/// # Returns
///
/// The parsed payload, unchanged, or `CrawlError::Protocol` when the body is
/// not JSON, not a JSON object, or reports `state`/`success` as `false`.
pub fn parse_payload(page: u32, body: &[u8], dialect: Dialect) -> Result<Value, CrawlError> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| {
        let preview = truncate_for_log(&String::from_utf8_lossy(body), 200);
        warn!(error = %e, body_preview = %preview, "Response is not JSON");
        CrawlError::Protocol {
            page,
            reason: format!("response is not valid JSON: {e}"),
        }
    })?;

    if !payload.is_object() {
        return Err(CrawlError::Protocol {
            page,
            reason: "response is not a JSON object".to_string(),
        });
    }
    if let Some(flag) = dialect.failed_flag(&payload) {
        return Err(CrawlError::Protocol {
            page,
            reason: format!("payload reports {flag} = false"),
        });
    }
    Ok(payload)
}
