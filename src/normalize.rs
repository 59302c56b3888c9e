//! Mapping of raw upstream records onto [`NormalizedArticle`].
//!
//! Extraction is defensive: a field that is missing, has the wrong JSON type,
//! or is blank after trimming is treated as absent. Normalization never fails.
//!
//! Each output field also accepts its own output key as a fallback source, so
//! normalizing an already-normalized record gives back the same record.

use crate::models::NormalizedArticle;
use serde_json::{Map, Value};
use url::Url;

/// Sub-fields of a structured `time` value, in order of preference.
const TIME_SUBFIELDS: [&str; 3] = ["date", "time", "datetime"];

/// Normalize one raw article. Anything other than a JSON object yields an
/// empty record.
pub fn normalize_article(raw: &Value, origin: &Url) -> NormalizedArticle {
    let Some(record) = raw.as_object() else {
        return NormalizedArticle::default();
    };

    NormalizedArticle {
        title: trimmed(record, "title"),
        link: first_of(record, &["titleLink", "link"]).and_then(|link| resolve(origin, &link)),
        summary: first_of(record, &["paragraph", "summary"]),
        time: extract_time(record.get("time")).or_else(|| trimmed(record, "published_at")),
        image: raw_string(record, "url").or_else(|| raw_string(record, "image")),
    }
}

/// Trimmed string value of `key`, if non-empty.
fn trimmed(record: &Map<String, Value>, key: &str) -> Option<String> {
    non_blank(record.get(key)?.as_str()?)
}

fn first_of(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| trimmed(record, key))
}

/// Untrimmed string value of `key`, if non-empty.
fn raw_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    record
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn extract_time(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_blank(s),
        Value::Object(fields) => TIME_SUBFIELDS
            .iter()
            .find_map(|key| trimmed(fields, key)),
        _ => None,
    }
}

/// Resolve a relative or absolute link against `origin`.
fn resolve(origin: &Url, link: &str) -> Option<String> {
    origin.join(link).ok().map(String::from)
}
