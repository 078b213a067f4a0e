//! Play-address scraping for non-primary platforms
//!
//! Pages on other platforms embed their bootstrap data as JSON inside the
//! HTML. The scraper looks for the first `"playAddr":{...}` object, parses
//! it and reads the stream URL from it. This is a pattern match against the
//! raw body, not an HTML parse.

use crate::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Key wrapping the embedded play-address object
const PLAY_ADDR_KEY: &str = "playAddr";
/// Field of the play-address object holding the stream URL
const STREAM_FIELD: &str = "ori_m3u8";

static PLAY_ADDR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"playAddr":\{.*?\}"#).expect("valid playAddr pattern"));

/// Resolves page URLs of one platform into direct media URLs
#[async_trait]
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this extractor handles the page
    fn matches(&self, page: &Url) -> bool;

    /// Direct media URL for the page
    async fn extract(&self, page: &Url) -> Result<String>;
}

/// Catch-all extractor reading the embedded `playAddr` object
#[derive(Debug, Clone)]
pub struct PlayAddrExtractor {
    client: Client,
}

impl PlayAddrExtractor {
    /// Create a new extractor using the shared HTTP client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_page(&self, page: &Url) -> Result<String> {
        let response = self.client.get(page.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(format!(
                "page {} returned status {}",
                page, status
            )));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Extractor for PlayAddrExtractor {
    fn name(&self) -> &'static str {
        "playAddr"
    }

    fn matches(&self, _page: &Url) -> bool {
        true
    }

    async fn extract(&self, page: &Url) -> Result<String> {
        let body = self.fetch_page(page).await?;
        debug!("Fetched {} bytes from {}", body.len(), page);
        extract_play_addr(&body)
    }
}

/// Pull the stream URL out of an HTML body.
///
/// Fails with [`Error::PatternNotFound`] when no `playAddr` object is
/// present, [`Error::MalformedJson`] when the matched fragment does not
/// parse, and [`Error::FieldNotFound`] when the stream field is missing.
pub fn extract_play_addr(body: &str) -> Result<String> {
    let fragment = PLAY_ADDR_RE
        .find(body)
        .ok_or_else(|| Error::pattern_not_found("no playAddr found in HTML"))?;

    let wrapped = format!("{{{}}}", fragment.as_str());
    let parsed: Value = serde_json::from_str(&wrapped)
        .map_err(|e| Error::malformed_json(format!("failed to parse playAddr JSON: {}", e)))?;

    parsed
        .get(PLAY_ADDR_KEY)
        .and_then(|addr| addr.get(STREAM_FIELD))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::field_not_found(format!("{}.{}", PLAY_ADDR_KEY, STREAM_FIELD)))
}
