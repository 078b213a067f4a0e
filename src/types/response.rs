//! Response type definitions
//!
//! Defines the JSON bodies returned by the auxiliary endpoints.

use serde::{Deserialize, Serialize};

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,

    /// Entries currently held by the resolution cache
    pub cached_links: usize,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>, cached_links: usize) -> Self {
        Self {
            server_uptime,
            version: version.into(),
            cached_links,
        }
    }
}
