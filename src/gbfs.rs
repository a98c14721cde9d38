//! GBFS document handling: the archival wrapper for fetched root manifests
//! and sub-feed URL discovery.
//!
//! Manifests are kept as untyped `serde_json::Value` so the archived copy
//! is exactly what the provider served, presence checks and all.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A fetched root manifest wrapped for archival.
///
/// The timestamp is captured at fetch completion, not taken from any
/// feed-reported time, and the serialized form is what lands at
/// `{provider}/gbfs.json`.
#[derive(Debug, Serialize)]
pub struct FetchResult {
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

impl FetchResult {
    pub fn new(provider: &str, data: Value) -> Self {
        Self {
            provider: provider.to_string(),
            timestamp: Utc::now(),
            data,
        }
    }
}

/// Returns the URL of the first feed named `feed_name` in the manifest's
/// `data.<lang>.feeds` list.
///
/// Feed names are assumed unique but not enforced; first match wins. A
/// missing language key, feeds array, or name is a miss (`None`), never an
/// error.
pub fn feed_url<'a>(manifest: &'a Value, lang: &str, feed_name: &str) -> Option<&'a str> {
    manifest
        .get("data")?
        .get(lang)?
        .get("feeds")?
        .as_array()?
        .iter()
        .find(|feed| feed.get("name").and_then(Value::as_str) == Some(feed_name))?
        .get("url")?
        .as_str()
}
