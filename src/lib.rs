//! vidproxy - direct media link resolver
//!
//! Resolves a video page URL into the short-lived direct media URL behind
//! it and redirects the caller there.
//!
//! # Architecture
//!
//! - **Primary platform** pages are identified by their video id (modern
//!   `BV…` ids, or legacy `av…` ids transcoded to the modern scheme) and an
//!   optional part number. Resolution goes through a metadata → playback API
//!   exchange and results are cached until shortly before the deadline
//!   embedded in the resolved link.
//! - **Other platforms** are handled by scraping the embedded `playAddr`
//!   bootstrap object out of the page HTML. Nothing is cached on this path.
//!
//! # Usage
//!
//! ```bash
//! vidproxy --port 8000 --host 0.0.0.0
//! curl -i 'http://localhost:8000/proxy?url=https://www.bilibili.com/video/BV1xx411c7mD'
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use vidproxy::{LinkResolver, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let resolver = LinkResolver::new(Settings::default())?;
//! let page = url::Url::parse("https://www.bilibili.com/video/av170001?p=2")?;
//! let direct = resolver.resolve(&page).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;
pub mod server;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use resolver::LinkResolver;
pub use types::{CacheKey, PartIndex, PingResponse, VideoId};
