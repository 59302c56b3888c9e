//! Pagination and termination conventions of the listing endpoint.
//!
//! Two revisions of the endpoint are seen in the wild. They disagree on the
//! first page index and on how the last page is announced, so the crawl loop
//! asks the [`Dialect`] instead of hardcoding either convention.

use clap::ValueEnum;
use serde::Deserialize;
use serde_json::Value;

/// Key under which both revisions return the article list.
const LIST_KEY: &str = "lists";

/// Boolean fields that, when present and `false`, mark a failed page.
const SUCCESS_FIELDS: [&str; 2] = ["state", "success"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Zero-based pages; the last page carries a truthy `end` field.
    #[default]
    More,
    /// One-based pages; the feed ends on a truthy `end` or an empty list.
    Paged,
}

impl Dialect {
    /// Index of the first page.
    pub fn first_page(self) -> u32 {
        match self {
            Dialect::More => 0,
            Dialect::Paged => 1,
        }
    }

    /// Raw article records of a page. A missing or mistyped list is empty.
    pub fn articles(self, payload: &Value) -> &[Value] {
        payload
            .get(LIST_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether no page exists after this one.
    pub fn is_end_of_feed(self, payload: &Value) -> bool {
        let end = payload.get("end").is_some_and(is_truthy);
        match self {
            Dialect::More => end,
            Dialect::Paged => end || self.articles(payload).is_empty(),
        }
    }

    /// Name of the explicit success flag that is present and `false`, if any.
    pub fn failed_flag(self, payload: &Value) -> Option<&'static str> {
        SUCCESS_FIELDS
            .into_iter()
            .find(|field| payload.get(*field).and_then(Value::as_bool) == Some(false))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
