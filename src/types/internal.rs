//! Internal data structures
//!
//! Identifier, part selector and cache key types shared by the resolver
//! and the cache.

use std::fmt;

/// Canonical alphanumeric video identifier (`BV` + 10 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Length of a canonical identifier
    pub const LEN: usize = 12;

    /// Wrap an identifier, normalizing the two-letter marker to upper case.
    ///
    /// Returns `None` unless the input is the marker followed by exactly
    /// ten ASCII alphanumerics.
    pub fn new(raw: &str) -> Option<Self> {
        if raw.len() != Self::LEN || !raw.is_ascii() {
            return None;
        }
        let (marker, body) = raw.split_at(2);
        if !marker.eq_ignore_ascii_case("BV") || !body.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        Some(Self(format!("BV{}", body)))
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 1-based selector among the parts of one video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartIndex(u32);

impl PartIndex {
    /// First part, used when the request names none
    pub const FIRST: PartIndex = PartIndex(1);

    /// Create a part index; zero is rejected
    pub fn new(index: u32) -> Option<Self> {
        (index >= 1).then_some(Self(index))
    }

    /// Interpret the raw `p` query value.
    ///
    /// Absent or non-integer values select the first part; integers below 1
    /// are rejected.
    pub fn from_query(raw: Option<&str>) -> crate::Result<Self> {
        let Some(value) = raw.and_then(|v| v.trim().parse::<i64>().ok()) else {
            return Ok(Self::FIRST);
        };

        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| crate::Error::invalid_argument(format!("invalid part index: p={}", value)))
    }

    /// 1-based value
    pub fn get(self) -> u32 {
        self.0
    }

    /// 0-based position into a part list
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl Default for PartIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PartIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Cache key identifying one resolved part of one video
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Video identifier
    pub video: VideoId,
    /// Selected part
    pub part: PartIndex,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(video: VideoId, part: PartIndex) -> Self {
        Self { video, part }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.video, self.part)
    }
}
