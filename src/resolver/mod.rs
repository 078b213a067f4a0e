//! Link resolution engine
//!
//! This module turns video page URLs into direct media URLs: identifier
//! parsing and transcoding, the upstream two-step lookup, the deadline-aware
//! cache and the fallback page scraper, tied together by the resolver facade.

pub mod cache;
pub mod codec;
pub mod deadline;
pub mod extractor;
pub mod manager;
pub mod target;
pub mod upstream;

pub use cache::{ExpiringCache, LinkCache};
pub use deadline::{Clock, DeadlineExtractor, ManualClock, SystemClock};
pub use extractor::{Extractor, PlayAddrExtractor};
pub use manager::{LinkResolver, LinkResolverGeneric};
pub use target::Target;
pub use upstream::{BilibiliClient, PlaybackProvider};
