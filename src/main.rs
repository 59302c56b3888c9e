//! # UDN Crawler
//!
//! Fetches the paginated breaking-news listing of United Daily News (聯合報)
//! from its public JSON endpoint, normalizes every article into a small sparse
//! record and writes the collected list as one JSON document.
//!
//! ## Usage
//!
//! ```sh
//! udn_crawler --pages 2 --output udn.json
//! ```
//!
//! ## Architecture
//!
//! One sequential pipeline:
//! 1. **Request**: build the GET for a page ([`request`])
//! 2. **Fetch**: send it and validate the payload ([`api`])
//! 3. **Normalize**: map each raw article to a [`models::NormalizedArticle`] ([`normalize`])
//! 4. **Crawl**: repeat per page, honouring the delay and end of feed ([`crawl`])
//! 5. **Output**: write the JSON array to a file or stdout ([`outputs`])

use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod crawl;
mod dialect;
mod error;
mod models;
mod normalize;
mod outputs;
mod request;
mod utils;

use cli::Cli;
use config::Endpoint;
use error::CrawlError;
use models::NormalizedArticle;
use outputs::json::{self, WriteOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the JSON document.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(&args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(page = ?e.page(), "Run failed");
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// The one line printed to stderr when a run fails.
fn failure_message(e: &CrawlError) -> String {
    format!("error: {e}").replace(['\r', '\n'], " ")
}

/// Collect the articles and write them out.
#[instrument(level = "info", skip_all)]
async fn run(args: &Cli) -> Result<WriteOutcome, CrawlError> {
    let start_time = std::time::Instant::now();
    let endpoint = args.endpoint()?;

    let mut articles = match &args.from_file {
        Some(path) => load_payload(&endpoint, path).await?,
        None => {
            let config = args.crawl_config()?;
            crawl::crawl_breaking_news(&endpoint, &config).await?
        }
    };

    if args.drop_incomplete {
        let before = articles.len();
        articles.retain(NormalizedArticle::is_complete);
        info!(dropped = before - articles.len(), "Dropped incomplete articles");
    }

    let outcome = json::write_articles(&articles, args.output.as_deref(), args.indent).await?;

    let elapsed = start_time.elapsed();
    info!(
        articles = articles.len(),
        millis = elapsed.as_millis() as u64,
        "Execution complete"
    );
    Ok(outcome)
}

/// Normalize a page payload saved to disk earlier.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
async fn load_payload(endpoint: &Endpoint, path: &Path) -> Result<Vec<NormalizedArticle>, CrawlError> {
    let body = tokio::fs::read(path).await?;
    let payload = api::parse_payload(endpoint.dialect.first_page(), &body, endpoint.dialect)?;
    let articles = crawl::normalize_payload(endpoint, &payload);
    info!(count = articles.len(), "Normalized saved payload");
    Ok(articles)
}
