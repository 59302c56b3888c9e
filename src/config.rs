//! Crawl configuration.
//!
//! Values are layered: built-in constants, then an optional YAML settings
//! file, then command-line flags. The result is two immutable values handed to
//! the crawl loop: an [`Endpoint`] describing where and how to ask, and a
//! [`CrawlConfig`] describing what to ask for.

use crate::dialect::Dialect;
use crate::error::CrawlError;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://udn.com/api/more";
pub const DEFAULT_ORIGIN: &str = "https://udn.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

/// Contents of the optional YAML settings file.
///
/// ```yaml
/// base_url: https://udn.com/api/more
/// origin: https://udn.com
/// dialect: paged
/// timeout_secs: 5
/// params:
///   cate_id: "99"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub base_url: String,
    pub origin: String,
    pub user_agent: String,
    pub dialect: Dialect,
    pub timeout_secs: f64,
    /// Extra query parameters sent with every page, in file order.
    pub params: Mapping,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            dialect: Dialect::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            params: Mapping::new(),
        }
    }
}

impl Settings {
    /// Read settings from a YAML file. Missing keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let path = path.as_ref();
        let settings_error = |reason: String| CrawlError::Settings {
            path: path.display().to_string(),
            reason,
        };
        let content = fs::read_to_string(path).map_err(|e| settings_error(e.to_string()))?;
        let settings: Settings =
            serde_yaml::from_str(&content).map_err(|e| settings_error(e.to_string()))?;
        info!(dialect = ?settings.dialect, base_url = %settings.base_url, "Loaded settings");
        Ok(settings)
    }

    /// Validate and convert into an [`Endpoint`].
    pub fn endpoint(&self) -> Result<Endpoint, CrawlError> {
        let parse = |name: &str, raw: &str| {
            Url::parse(raw)
                .map_err(|e| CrawlError::InvalidConfiguration(format!("{name} {raw:?}: {e}")))
        };
        let user_agent = HeaderValue::from_str(&self.user_agent).map_err(|e| {
            CrawlError::InvalidConfiguration(format!("user_agent {:?}: {e}", self.user_agent))
        })?;
        Ok(Endpoint {
            base_url: parse("base_url", &self.base_url)?,
            origin: parse("origin", &self.origin)?,
            user_agent,
            dialect: self.dialect,
            timeout: seconds("timeout", self.timeout_secs)?,
            default_params: self
                .params
                .iter()
                .map(|(k, v)| Ok((scalar("params key", k)?, scalar("params value", v)?)))
                .collect::<Result<_, CrawlError>>()?,
        })
    }
}

/// Render a YAML scalar as a query string value.
fn scalar(what: &str, value: &YamlValue) -> Result<String, CrawlError> {
    match value {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => Err(CrawlError::InvalidConfiguration(format!(
            "{what} must be a string, number or boolean, got {other:?}"
        ))),
    }
}

/// Where and how pages are requested. Constant for the whole crawl.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Listing endpoint, without query string.
    pub base_url: Url,
    /// Origin relative article links are resolved against.
    pub origin: Url,
    /// Validated `User-Agent` header value.
    pub user_agent: HeaderValue,
    pub dialect: Dialect,
    /// Per-request timeout.
    pub timeout: Duration,
    pub default_params: Vec<(String, String)>,
}

/// What to crawl. Supplied by the caller and immutable during a crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of pages to fetch, at least 1.
    pub pages: u32,
    /// Pause between two consecutive page fetches.
    pub delay: Duration,
    pub category_id: u32,
    pub channel_id: u32,
    pub news_type: String,
    /// Caller overrides merged over the endpoint's default parameters.
    pub params: Vec<(String, String)>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            pages: 1,
            delay: Duration::from_secs(1),
            category_id: 1,
            channel_id: 1,
            news_type: "breaknews".to_string(),
            params: Vec::new(),
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.pages < 1 {
            return Err(CrawlError::InvalidConfiguration(
                "--pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Convert a user-supplied number of seconds, rejecting negative or non-finite values.
pub fn seconds(name: &str, secs: f64) -> Result<Duration, CrawlError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        CrawlError::InvalidConfiguration(format!(
            "{name} must be a non-negative number of seconds, got {secs}"
        ))
    })
}

/// Parse a `KEY=VALUE` pair given on the command line.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_endpoint() {
        let endpoint = Settings::default().endpoint().unwrap();
        assert_eq!(endpoint.base_url.as_str(), "https://udn.com/api/more");
        assert_eq!(endpoint.origin.as_str(), "https://udn.com/");
        assert_eq!(endpoint.dialect, Dialect::More);
        assert_eq!(endpoint.timeout, Duration::from_secs(10));
        assert!(
            endpoint
                .user_agent
                .to_str()
                .unwrap()
                .starts_with("Mozilla/5.0")
        );
    }

    #[test]
    fn test_load_partial_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "dialect: paged\ntimeout_secs: 2.5\nparams:\n  cate_id: \"99\"\n"
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        let endpoint = settings.endpoint().unwrap();
        assert_eq!(endpoint.dialect, Dialect::Paged);
        assert_eq!(endpoint.timeout, Duration::from_millis(2500));
        assert_eq!(
            endpoint.default_params,
            vec![("cate_id".to_string(), "99".to_string())]
        );
    }

    #[test]
    fn test_unknown_settings_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pagez: 3").unwrap();
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, CrawlError::Settings { .. }));
    }

    #[test]
    fn test_missing_settings_file() {
        let err = Settings::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, CrawlError::Settings { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let settings = Settings {
            base_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.endpoint(),
            Err(CrawlError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_user_agent_with_newline_is_rejected() {
        let settings = Settings {
            user_agent: "Mozilla/5.0\nInjected: yes".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.endpoint(),
            Err(CrawlError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_params_keep_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "params:\n  totalRecNo: 100\n  cate_id: \"99\"\n  adult: false\n"
        )
        .unwrap();

        let endpoint = Settings::load(file.path()).unwrap().endpoint().unwrap();
        assert_eq!(
            endpoint.default_params,
            vec![
                ("totalRecNo".to_string(), "100".to_string()),
                ("cate_id".to_string(), "99".to_string()),
                ("adult".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_param_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "params:\n  filter:\n    - a\n    - b\n").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert!(matches!(
            settings.endpoint(),
            Err(CrawlError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_pages_rejected() {
        let config = CrawlConfig {
            pages: 0,
            ..CrawlConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CrawlError::InvalidConfiguration(_))
        ));
        assert!(CrawlConfig::default().validate().is_ok());
    }

    #[test]
    fn test_seconds() {
        assert_eq!(seconds("delay", 0.0).unwrap(), Duration::ZERO);
        assert_eq!(seconds("delay", 1.5).unwrap(), Duration::from_millis(1500));
        assert!(seconds("delay", -1.0).is_err());
        assert!(seconds("delay", f64::NAN).is_err());
        assert!(seconds("delay", f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("cate_id=99").unwrap(),
            ("cate_id".to_string(), "99".to_string())
        );
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }
}
