//! Application settings loading from config.toml
//!
//! This module provides functionality to load service settings from a TOML
//! configuration file, with the environment taking precedence for the
//! database URL (`DATABASE_URL`). Missing file or fields fall back to
//! defaults so the service can start with zero configuration.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default page size for product listings when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound on caller-supplied page sizes
pub const MAX_PAGE_SIZE: u64 = 100;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Database connection string; overridden by `DATABASE_URL` if set
    #[serde(default = "crate::config::database::get_database_url")]
    pub database_url: String,
    /// Page size used when a listing request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Largest page size a listing request may ask for
    #[serde(default = "max_page_size")]
    pub max_page_size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn max_page_size() -> u64 {
    MAX_PAGE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: crate::config::database::get_database_url(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Loads application settings from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let mut config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    // Environment wins over the file for the connection string
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_url = url;
    }

    Ok(config)
}

/// Loads settings from the default location (./config.toml), falling back to
/// defaults if the file does not exist.
pub fn load_default_config() -> Result<AppConfig> {
    if Path::new("config.toml").exists() {
        load_config("config.toml")
    } else {
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            database_url = "sqlite://test.sqlite"
            default_page_size = 25
            max_page_size = 50
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite://test.sqlite");
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.max_page_size, 50);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_page_size, MAX_PAGE_SIZE);
    }
}
