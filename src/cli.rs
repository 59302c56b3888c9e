//! Command-line interface definitions.
//!
//! Endpoint-level settings (base URL, origin, user agent, extra parameters)
//! can also come from a YAML file passed with `--config`; flags given here
//! take precedence over that file.

use crate::config::{self, CrawlConfig, Endpoint, Settings};
use crate::dialect::Dialect;
use crate::error::CrawlError;
use clap::Parser;
use std::path::PathBuf;

/// Crawl the United Daily News breaking-news feed and print the articles as JSON.
///
/// # Examples
///
/// ```sh
/// # First page to standard output
/// udn_crawler
///
/// # Three pages, half a second apart, into a file
/// udn_crawler --pages 3 --delay 0.5 --output data/udn.json
///
/// # Normalize a payload saved earlier, without touching the network
/// udn_crawler --from-file raw/page0.json --drop-incomplete
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of pages to crawl
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Delay in seconds between page requests
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub delay: f64,

    /// Category ID for the feed (1 is breaking news)
    #[arg(long, default_value_t = 1)]
    pub category_id: u32,

    /// Channel ID for the feed (1 is breaking news)
    #[arg(long, default_value_t = 1)]
    pub channel_id: u32,

    /// News type parameter
    #[arg(long = "type", default_value = "breaknews")]
    pub news_type: String,

    /// Pagination convention of the endpoint [default: from settings, else more]
    #[arg(long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Per-request timeout in seconds [default: from settings, else 10]
    #[arg(long, allow_negative_numbers = true)]
    pub timeout: Option<f64>,

    /// Extra query parameter, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = config::parse_param)]
    pub params: Vec<(String, String)>,

    /// Path to write the collected articles to (default: standard output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON indentation width
    #[arg(long, default_value_t = 2)]
    pub indent: usize,

    /// Optional path to a YAML settings file
    #[arg(short, long, env = "UDN_CRAWLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Normalize a saved page payload instead of crawling
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Drop articles that lack a title or a link
    #[arg(long)]
    pub drop_incomplete: bool,
}

impl Cli {
    /// Endpoint from the settings file (if any) with flag overrides applied.
    pub fn endpoint(&self) -> Result<Endpoint, CrawlError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(dialect) = self.dialect {
            settings.dialect = dialect;
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_secs = timeout;
        }
        settings.endpoint()
    }

    pub fn crawl_config(&self) -> Result<CrawlConfig, CrawlError> {
        let config = CrawlConfig {
            pages: self.pages,
            delay: config::seconds("--delay", self.delay)?,
            category_id: self.category_id,
            channel_id: self.channel_id,
            news_type: self.news_type.clone(),
            params: self.params.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["udn_crawler"]);
        assert_eq!(cli.pages, 1);
        assert_eq!(cli.delay, 1.0);
        assert_eq!(cli.indent, 2);
        assert_eq!(cli.news_type, "breaknews");
        assert!(cli.output.is_none());
        assert!(!cli.drop_incomplete);

        let config = cli.crawl_config().unwrap();
        assert_eq!(config.delay, Duration::from_secs(1));
        assert_eq!((config.category_id, config.channel_id), (1, 1));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["udn_crawler", "-p", "3", "-d", "0.5", "-o", "/tmp/udn.json"]);
        assert_eq!(cli.pages, 3);
        assert_eq!(cli.delay, 0.5);
        assert_eq!(cli.output, Some(PathBuf::from("/tmp/udn.json")));
    }

    #[test]
    fn test_zero_pages_is_rejected() {
        assert!(Cli::try_parse_from(["udn_crawler", "--pages", "0"]).is_err());
    }

    #[test]
    fn test_negative_delay_is_invalid_configuration() {
        let cli = Cli::parse_from(["udn_crawler", "--delay", "-1"]);
        assert!(matches!(
            cli.crawl_config(),
            Err(CrawlError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_params_and_dialect() {
        let cli = Cli::parse_from([
            "udn_crawler",
            "--param",
            "cate_id=99",
            "--param",
            "totalRecNo=100",
            "--dialect",
            "paged",
            "--type",
            "cate_latest_news",
        ]);
        assert_eq!(
            cli.params,
            vec![
                ("cate_id".to_string(), "99".to_string()),
                ("totalRecNo".to_string(), "100".to_string()),
            ]
        );
        assert_eq!(cli.news_type, "cate_latest_news");
        assert_eq!(cli.endpoint().unwrap().dialect, Dialect::Paged);
    }

    #[test]
    fn test_malformed_param_is_rejected() {
        assert!(Cli::try_parse_from(["udn_crawler", "--param", "oops"]).is_err());
    }

    #[test]
    fn test_flags_override_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "dialect: paged\ntimeout_secs: 3\n").unwrap();

        let cli = Cli::parse_from([
            "udn_crawler",
            "--config",
            path.to_str().unwrap(),
            "--timeout",
            "1.5",
        ]);
        let endpoint = cli.endpoint().unwrap();
        assert_eq!(endpoint.dialect, Dialect::Paged);
        assert_eq!(endpoint.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_negative_timeout_is_invalid_configuration() {
        let cli = Cli::parse_from(["udn_crawler", "--timeout", "-2"]);
        assert!(matches!(
            cli.endpoint(),
            Err(CrawlError::InvalidConfiguration(_))
        ));
    }
}
