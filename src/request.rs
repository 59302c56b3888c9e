//! Request construction for one listing page.

use crate::config::{CrawlConfig, Endpoint};
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

/// A ready-to-send GET for one page.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u32,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

/// Build the request for `page`. Pure: no I/O, no global state.
///
/// Query parameters come out as `page`, `id`, `channelId`, `type`, then the
/// endpoint defaults, then the caller's overrides. A repeated key replaces the
/// earlier value in place, except `page`, which always reflects `page`.
///
/// # Arguments
///
/// * `endpoint` - Listing URL, validated user agent and default parameters
/// * `config` - Category, channel, news type and caller overrides
/// * `page` - Page index, already offset by the dialect's first page
///
/// # Returns
///
/// A [`PageRequest`] carrying the full URL and the `User-Agent` and `Accept`
/// headers. Building never fails; invalid header values are rejected earlier,
/// when the [`Endpoint`] is created.
pub fn build_request(endpoint: &Endpoint, config: &CrawlConfig, page: u32) -> PageRequest {
    let mut params: Vec<(String, String)> = vec![
        ("page".to_string(), page.to_string()),
        ("id".to_string(), config.category_id.to_string()),
        ("channelId".to_string(), config.channel_id.to_string()),
        ("type".to_string(), config.news_type.clone()),
    ];
    for (key, value) in endpoint.default_params.iter().chain(&config.params) {
        if key == "page" {
            continue;
        }
        match params.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.clone(),
            None => params.push((key.clone(), value.clone())),
        }
    }

    let mut url = endpoint.base_url.clone();
    url.query_pairs_mut().clear().extend_pairs(&params);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, endpoint.user_agent.clone());
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    PageRequest {
        page,
        method: Method::GET,
        url,
        headers,
    }
}
