//! Output record for one article.

use serde::{Deserialize, Serialize};

/// A simplified article as written to the output document.
///
/// The record is sparse: a field that was empty or missing upstream is left
/// out of the JSON entirely rather than written as `null` or `""`. Keys are
/// serialized in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedArticle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Always absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Publication time as given upstream, e.g. `2024-01-01 10:00`.
    #[serde(skip_serializing_if = "Option::is_none", alias = "published_at")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NormalizedArticle {
    /// Both a title and a link are present.
    pub fn is_complete(&self) -> bool {
        self.title.is_some() && self.link.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
