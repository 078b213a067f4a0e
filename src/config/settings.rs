//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the resolver service.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Browser-like identity sent with every upstream request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Main configuration settings for the resolver service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server configuration
    pub server: ServerSettings,
    /// Resolution cache configuration
    pub cache: CacheSettings,
    /// Upstream API configuration
    pub upstream: UpstreamSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Resolution cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum cache entries
    pub capacity: usize,
    /// Minimum remaining validity for a cached link to be served
    pub serve_margin_secs: i64,
    /// Validity subtracted from a fresh link before it is worth storing
    pub store_margin_secs: i64,
    /// Assumed validity when a link carries no readable deadline
    pub default_ttl_secs: i64,
}

/// Upstream API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Base URL of the metadata and playback APIs
    pub api_base: String,
    /// User-Agent header for upstream requests
    pub user_agent: String,
    /// Requested playback quality (`qn`)
    pub quality: u32,
    /// Domain whose pages go through the id/cache path
    pub primary_domain: String,
    /// Optional request timeout; the transport default applies when unset
    pub timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "::".to_string(),
            port: 8000,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 1000,
            serve_margin_secs: 60,
            store_margin_secs: 300,
            default_ttl_secs: 3600,
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.bilibili.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            quality: 116,
            primary_domain: "bilibili.com".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl UpstreamSettings {
    /// Request timeout as a [`Duration`], if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Settings {
    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| crate::Error::config(format!("Invalid config file {:?}: {}", path, e)))
    }

    /// Apply environment variable overrides
    pub fn merge_with_env(self) -> crate::Result<Self> {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn merge_with<F>(mut self, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("VIDPROXY_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("VIDPROXY_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid port: {}", e)))?;
        }

        if let Some(capacity) = lookup("VIDPROXY_CACHE_CAPACITY") {
            self.cache.capacity = capacity
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid cache capacity: {}", e)))?;
        }

        if let Some(api_base) = lookup("VIDPROXY_API_BASE") {
            self.upstream.api_base = api_base;
        }

        if let Some(user_agent) = lookup("VIDPROXY_USER_AGENT") {
            self.upstream.user_agent = user_agent;
        }

        if let Some(level) = lookup("VIDPROXY_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Reject settings the resolver cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.cache.capacity == 0 {
            return Err(crate::Error::config("cache capacity must be positive"));
        }

        if self.cache.serve_margin_secs >= self.cache.store_margin_secs {
            return Err(crate::Error::config(format!(
                "serve margin ({}s) must be below store margin ({}s)",
                self.cache.serve_margin_secs, self.cache.store_margin_secs
            )));
        }

        url::Url::parse(&self.upstream.api_base).map_err(|e| {
            crate::Error::config(format!(
                "Invalid upstream api base {:?}: {}",
                self.upstream.api_base, e
            ))
        })?;

        if self.upstream.user_agent.trim().is_empty() {
            return Err(crate::Error::config("user agent must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "::");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.cache.capacity, 1000);
        assert_eq!(settings.cache.serve_margin_secs, 60);
        assert_eq!(settings.cache.store_margin_secs, 300);
        assert_eq!(settings.cache.default_ttl_secs, 3600);
        assert_eq!(settings.upstream.quality, 116);
        assert!(settings.upstream.timeout().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_merge_with_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("VIDPROXY_PORT", "9000"),
            ("VIDPROXY_CACHE_CAPACITY", "16"),
            ("VIDPROXY_API_BASE", "http://127.0.0.1:1234"),
        ]);

        let settings = Settings::default()
            .merge_with(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.cache.capacity, 16);
        assert_eq!(settings.upstream.api_base, "http://127.0.0.1:1234");
        assert_eq!(settings.server.host, "::");
    }

    #[test]
    fn test_merge_with_invalid_port() {
        let result = Settings::default().merge_with(|key| {
            (key == "VIDPROXY_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut settings = Settings::default();
        settings.cache.capacity = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_margins() {
        let mut settings = Settings::default();
        settings.cache.serve_margin_secs = 600;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_relative_api_base() {
        let mut settings = Settings::default();
        settings.upstream.api_base = "api.bilibili.com".to_string();
        assert!(settings.validate().is_err());
    }
}
