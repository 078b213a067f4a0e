//! Configuration loading utilities
//!
//! Provides helper functions for loading configuration from various sources
//! with proper error handling and validation.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration loader with multiple source support
#[derive(Debug)]
pub struct ConfigLoader {
    /// Default settings
    defaults: Settings,
}

impl ConfigLoader {
    /// Create new configuration loader
    pub fn new() -> Self {
        Self {
            defaults: Settings::default(),
        }
    }

    /// Load configuration with precedence order:
    /// 1. Command line arguments (applied by the caller, highest priority)
    /// 2. Environment variables
    /// 3. Configuration file
    /// 4. Default values (lowest priority)
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let mut settings = self.defaults.clone();

        if let Some(path) = config_file {
            if path.exists() {
                info!("Loading configuration from file: {:?}", path);
                settings = Settings::from_file(path)?;
            } else {
                warn!("Configuration file not found: {:?}, using defaults", path);
            }
        }

        debug!("Applying environment variable overrides");
        settings = settings.merge_with_env()?;

        settings.validate()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:?}", settings);

        Ok(settings)
    }

    /// Load configuration from the explicit file, or the per-user default location
    pub fn load_default(&self, config_file: Option<&Path>) -> Result<Settings> {
        match config_file {
            Some(path) => self.load(Some(path)),
            None => {
                let default_path = default_config_path();
                self.load(default_path.as_deref())
            }
        }
    }

    /// Get default configuration
    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// `<config dir>/vidproxy/config.toml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vidproxy").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let loader = ConfigLoader::new();
        assert_eq!(loader.defaults().cache.capacity, 1000);
        assert_eq!(loader.defaults().upstream.primary_domain, "bilibili.com");
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"

[cache]
capacity = 32

[upstream]
quality = 80
        "#
        )
        .unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.cache.capacity, 32);
        assert_eq!(settings.cache.serve_margin_secs, 60);
        assert_eq!(settings.upstream.quality, 80);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[cache]\ncapacity = \"lots\"").unwrap();

        let result = Settings::from_file(temp_file.path());
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_load_file_rejected_by_validation() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[cache]\ncapacity = 0").unwrap();

        let loader = ConfigLoader::new();
        assert!(loader.load(Some(temp_file.path())).is_err());
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("vidproxy/config.toml"));
        }
    }
}
