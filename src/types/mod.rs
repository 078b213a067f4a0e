//! Type definitions for the resolver
//!
//! This module contains identifier types, upstream payloads and response bodies.

pub mod internal;
pub mod response;
pub mod upstream;

pub use internal::{CacheKey, PartIndex, VideoId};
pub use response::PingResponse;
pub use upstream::{PageInfo, PlayUrlResponse, ViewResponse};
