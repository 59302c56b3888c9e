//! JSON output of the collected articles.
//!
//! The document is a single array of [`NormalizedArticle`] objects, in crawl
//! order, UTF-8 encoded with non-ASCII characters left as-is. It is rendered
//! in memory first and written in one go, and only after the crawl finished,
//! so a failed crawl never leaves a file behind.

use crate::error::CrawlError;
use crate::models::NormalizedArticle;
use crate::utils::ensure_parent_dir;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, Write};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// How a write ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The reader of standard output went away before we were done.
    ConsumerClosed,
}

/// Render `articles` as an indented JSON array followed by a newline.
///
/// An `indent` of 0 still puts every value on its own line.
pub fn render(articles: &[NormalizedArticle], indent: usize) -> Result<Vec<u8>, CrawlError> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    articles.serialize(&mut ser)?;
    out.push(b'\n');
    Ok(out)
}

/// Write the articles to `output`, or to standard output when `None`.
///
/// # Arguments
///
/// * `articles` - Normalized articles in crawl order
/// * `output` - Target file; parent directories are created as needed
/// * `indent` - Number of spaces per nesting level
///
/// # Returns
///
/// [`WriteOutcome::Written`] on success, or [`WriteOutcome::ConsumerClosed`]
/// when standard output was closed by its reader. Any other I/O failure is an
/// error.
#[instrument(level = "info", skip_all, fields(count = articles.len(), output = ?output))]
pub async fn write_articles(
    articles: &[NormalizedArticle],
    output: Option<&Path>,
    indent: usize,
) -> Result<WriteOutcome, CrawlError> {
    let document = render(articles, indent)?;
    match output {
        Some(path) => {
            ensure_parent_dir(path).await?;
            fs::write(path, &document).await?;
            info!(path = %path.display(), bytes = document.len(), "Wrote JSON");
            Ok(WriteOutcome::Written)
        }
        None => {
            let stdout = io::stdout();
            let outcome = write_stream(stdout.lock(), &document)?;
            if outcome == WriteOutcome::ConsumerClosed {
                warn!("Standard output closed early; stopping");
            }
            Ok(outcome)
        }
    }
}

/// Write `document` to a stream, treating a closed pipe as a clean stop.
pub fn write_stream<W: Write>(mut writer: W, document: &[u8]) -> io::Result<WriteOutcome> {
    match writer.write_all(document).and_then(|()| writer.flush()) {
        Ok(()) => Ok(WriteOutcome::Written),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(WriteOutcome::ConsumerClosed),
        Err(e) => Err(e),
    }
}
