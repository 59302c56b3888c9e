//! The crawl loop.
//!
//! Pages are fetched strictly one after another: build the request, fetch,
//! normalize every item in order, then either stop (end of feed or last
//! configured page) or pause for the configured delay and continue. The first
//! error aborts the crawl and nothing collected so far is returned.

use crate::api::{FetchPage, HttpFetcher};
use crate::config::{CrawlConfig, Endpoint};
use crate::error::CrawlError;
use crate::models::NormalizedArticle;
use crate::normalize::normalize_article;
use crate::request::build_request;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Crawl with a freshly built HTTP client.
///
/// The client lives for exactly this call and is dropped on every exit path,
/// including an early abort.
#[instrument(level = "info", skip_all, fields(pages = config.pages, dialect = ?endpoint.dialect))]
pub async fn crawl_breaking_news(
    endpoint: &Endpoint,
    config: &CrawlConfig,
) -> Result<Vec<NormalizedArticle>, CrawlError> {
    config.validate()?;
    let client = reqwest::Client::builder()
        .build()
        .map_err(|source| CrawlError::Transport {
            page: endpoint.dialect.first_page(),
            source,
        })?;
    let fetcher = HttpFetcher::new(client, endpoint.timeout, endpoint.dialect);
    crawl(&fetcher, endpoint, config).await
}

/// Fetch up to `config.pages` pages through `fetcher` and collect the
/// normalized articles in upstream order.
///
/// # Arguments
///
/// * `fetcher` - Source of page payloads, one call per page
/// * `endpoint` - Dialect, origin and request defaults
/// * `config` - Page count, delay and query values for this crawl
///
/// # Returns
///
/// Every normalized article of every fetched page, in order, or the first
/// error. The crawl stops early when a payload signals end of feed, and never
/// pauses after the final fetch.
///
/// # Errors
///
/// `InvalidConfiguration` before any fetch when `config.pages` is 0; otherwise
/// whatever `fetcher` returned, unchanged.
pub async fn crawl<F: FetchPage>(
    fetcher: &F,
    endpoint: &Endpoint,
    config: &CrawlConfig,
) -> Result<Vec<NormalizedArticle>, CrawlError> {
    config.validate()?;

    let first = endpoint.dialect.first_page();
    let mut articles = Vec::new();

    for offset in 0..config.pages {
        let page = first + offset;
        let request = build_request(endpoint, config, page);
        let payload = fetcher.fetch(&request).await?;

        let before = articles.len();
        articles.extend(normalize_payload(endpoint, &payload));
        info!(page, count = articles.len() - before, total = articles.len(), "Fetched page");
        let empty = articles[before..].iter().filter(|a| a.is_empty()).count();
        if empty > 0 {
            warn!(page, empty, "Page contained records without usable fields");
        }

        if endpoint.dialect.is_end_of_feed(&payload) {
            info!(page, "End of feed");
            break;
        }

        let is_last = offset + 1 == config.pages;
        if !is_last && !config.delay.is_zero() {
            debug!(delay = ?config.delay, "Pausing before next page");
            sleep(config.delay).await;
        }
    }

    Ok(articles)
}

/// Normalize every article of one page payload, preserving order.
pub fn normalize_payload(endpoint: &Endpoint, payload: &Value) -> Vec<NormalizedArticle> {
    endpoint
        .dialect
        .articles(payload)
        .iter()
        .map(|raw| normalize_article(raw, &endpoint.origin))
        .collect()
}
