//! Remaining-validity computation for resolved links
//!
//! Direct media URLs carry their own absolute expiry as a `deadline` query
//! parameter (Unix seconds). Cache lifetimes are derived from it.

use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use url::Url;

/// Query parameter holding the absolute expiry timestamp
pub const DEADLINE_PARAM: &str = "deadline";

/// Source of the current Unix time
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Seconds since the Unix epoch
    fn now_unix(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for deterministic expiry
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Start the clock at the given Unix time
    pub fn new(now: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump to an absolute time
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Computes how long a resolved link stays valid
#[derive(Debug, Clone)]
pub struct DeadlineExtractor {
    clock: Arc<dyn Clock>,
    default_ttl_secs: i64,
}

impl DeadlineExtractor {
    /// Validity assumed when a link has no readable deadline
    pub const DEFAULT_TTL_SECS: i64 = 3600;

    /// Create an extractor with the given clock and fallback lifetime
    pub fn new(clock: Arc<dyn Clock>, default_ttl_secs: i64) -> Self {
        Self {
            clock,
            default_ttl_secs,
        }
    }

    /// Wall-clock extractor with the standard fallback
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Self::DEFAULT_TTL_SECS)
    }

    /// Seconds until the link's deadline, floored at zero.
    ///
    /// Any failure (unparsable URL, missing or non-numeric deadline) yields
    /// the configured default.
    pub fn remaining_secs(&self, url: &str) -> i64 {
        match deadline_of(url) {
            Some(deadline) => deadline.saturating_sub(self.clock.now_unix()).max(0),
            None => self.default_ttl_secs,
        }
    }
}

fn deadline_of(url: &str) -> Option<i64> {
    let parsed = Url::parse(url).ok()?;
    let (_, value) = parsed
        .query_pairs()
        .find(|(key, _)| key == DEADLINE_PARAM)?;
    value.trim().parse().ok()
}
