//! Request target parsing
//!
//! Turns the `url` query value of a proxy request into either a primary
//! platform target (video id + part) or a generic page URL.

use crate::{
    Error, Result,
    resolver::codec,
    types::{CacheKey, PartIndex, VideoId},
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Query parameter selecting the part of a video
pub const PART_PARAM: &str = "p";

static BV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bBV[0-9A-Za-z]{10}\b").expect("valid BV pattern"));
static AV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bav\d+").expect("valid av pattern"));

/// What a proxy request asks to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A video on the primary platform
    Primary(CacheKey),
    /// Any other page
    Generic(Url),
}

/// Parse the raw `url` value, re-attaching stray query parameters.
///
/// Intermediate layers often split an unencoded target such as
/// `url=https://host/video/BV..?p=2` at its `&`s, leaving the target's own
/// parameters as siblings of `url`. For primary platform pages those
/// siblings are appended back onto the target before it is interpreted.
pub fn rebuild_target(raw: &str, extra: &[(String, String)], primary_domain: &str) -> Result<Url> {
    let mut target = Url::parse(raw).map_err(|e| Error::invalid_input(format!("Invalid URL: {}", e)))?;

    if target.cannot_be_a_base() || target.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_input(format!("Invalid URL: {}", raw)));
    }

    if !extra.is_empty() && is_primary(&target, primary_domain) {
        target.query_pairs_mut().extend_pairs(extra);
        debug!("Rebuilt target URL: {}", target);
    }

    Ok(target)
}

/// Whether the page belongs to the primary platform
pub fn is_primary(target: &Url, primary_domain: &str) -> bool {
    target.host_str().is_some_and(|host| {
        host.eq_ignore_ascii_case(primary_domain)
            || host
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", primary_domain.to_ascii_lowercase()))
    })
}

/// Classify a validated target URL
pub fn classify(target: &Url, primary_domain: &str) -> Result<Target> {
    if !is_primary(target, primary_domain) {
        return Ok(Target::Generic(target.clone()));
    }

    let video = video_id_from_path(target.path())
        .or_else(|_| find_video_id(target.as_str()))?;
    let part = PartIndex::from_query(
        target
            .query_pairs()
            .find(|(key, _)| key == PART_PARAM)
            .map(|(_, value)| value)
            .as_deref(),
    )?;

    Ok(Target::Primary(CacheKey::new(video, part)))
}

/// Find the video identifier in a page path, transcoding legacy ids
pub fn video_id_from_path(path: &str) -> Result<VideoId> {
    find_video_id(path)
}

/// Find the first video identifier anywhere in `haystack`.
///
/// Modern ids win over legacy ids; embed players and event pages carry
/// the id in the query (`?bvid=BV...`, `?aid=av...`), so callers may pass
/// a whole URL.
pub fn find_video_id(haystack: &str) -> Result<VideoId> {
    if let Some(found) = BV_RE.find(haystack) {
        return VideoId::new(found.as_str())
            .ok_or_else(|| Error::invalid_identifier(found.as_str().to_string()));
    }

    if let Some(found) = AV_RE.find(haystack) {
        return codec::av_to_bv(found.as_str());
    }

    Err(Error::invalid_identifier(format!(
        "unable to extract video id from {:?}",
        haystack
    )))
}
