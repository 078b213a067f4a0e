//! Upstream API payloads
//!
//! Only the fields the resolver reads are modelled; everything else in the
//! upstream JSON is ignored. Missing objects deserialize to empty defaults so
//! absent data surfaces as a resolver error rather than a decode failure.

use serde::Deserialize;

/// `GET /x/web-interface/view` response envelope
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewResponse {
    /// Video metadata
    pub data: Option<ViewData>,
}

/// Video metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewData {
    /// Playable parts in display order
    pub pages: Vec<PageInfo>,
}

/// One playable part of a video
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    /// Internal content id
    pub cid: Option<u64>,
}

/// `GET /x/player/playurl` response envelope
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayUrlResponse {
    /// Playback data
    pub data: Option<PlayUrlData>,
}

/// Playback data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayUrlData {
    /// Direct URL segments
    pub durl: Option<Vec<DirectUrl>>,
}

/// One direct URL entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectUrl {
    /// Direct media URL
    pub url: Option<String>,
}

impl ViewResponse {
    /// Parts listed in the response, empty when the data object is missing
    pub fn pages(&self) -> &[PageInfo] {
        self.data.as_ref().map(|d| d.pages.as_slice()).unwrap_or_default()
    }
}

impl PlayUrlResponse {
    /// URL of the first direct entry, if present and non-empty
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .durl
            .as_ref()?
            .first()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}
