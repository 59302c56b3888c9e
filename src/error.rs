//! Error taxonomy for a crawl.
//!
//! Every fallible operation in the crate returns [`CrawlError`]. Fetch errors
//! carry the page index that failed so the single-line message printed by the
//! binary is enough to diagnose a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Rejected before any network activity.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// DNS, connect, reset or timeout failure.
    #[error("failed to fetch page {page}: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status code {status} for page {page}")]
    HttpStatus { page: u32, status: u16 },

    /// Body is not JSON, not an object, or carries a false success flag.
    #[error("invalid payload for page {page}: {reason}")]
    Protocol { page: u32, reason: String },

    #[error("failed to load settings from {path}: {reason}")]
    Settings { path: String, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode articles: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CrawlError {
    /// Page index the error belongs to, if it came from a fetch.
    pub fn page(&self) -> Option<u32> {
        match self {
            CrawlError::Transport { page, .. }
            | CrawlError::HttpStatus { page, .. }
            | CrawlError::Protocol { page, .. } => Some(*page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_single_line() {
        let errors = [
            CrawlError::InvalidConfiguration("--pages must be at least 1".into()),
            CrawlError::HttpStatus { page: 2, status: 500 },
            CrawlError::Protocol {
                page: 0,
                reason: "state flag is false".into(),
            },
        ];
        for e in errors {
            assert!(!e.to_string().contains('\n'), "{e}");
        }
    }

    #[test]
    fn test_page_is_reported_for_fetch_errors() {
        assert_eq!(CrawlError::HttpStatus { page: 3, status: 404 }.page(), Some(3));
        assert_eq!(CrawlError::InvalidConfiguration("x".into()).page(), None);
    }
}
