//! Settings of the `reindex` binary, read from a TOML file.
//!
//! ```toml
//! [store]
//! path = "./data"
//!
//! [log]
//! level = "info"
//!
//! [import]
//! excerpt_length = 200
//! ```
//!
//! Every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::import::DEFAULT_EXCERPT_LENGTH;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("store.path must not be empty".to_owned()));
        }
        Ok(())
    }
}

/// Where the documents live: a [`crate::stores::fs::FileSystemStore`] directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// An `EnvFilter` directive, e.g. `info` or `reindex=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum length of the excerpts computed for imported posts.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
}

fn default_excerpt_length() -> usize {
    DEFAULT_EXCERPT_LENGTH
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            excerpt_length: default_excerpt_length(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.store.path, PathBuf::from("./data"));
        assert_eq!(config.log.level, "info");
        assert_eq!(config.import.excerpt_length, 200);
    }

    #[test]
    fn test_partial() {
        let config = Config::from_toml(
            r#"
            [store]
            path = "/var/lib/reindex"

            [import]
            "#,
        )
        .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/var/lib/reindex"));
        assert_eq!(config.log.level, "info");
        assert_eq!(config.import.excerpt_length, 200);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            Config::from_toml("[store]\npath = \"\""),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Config::from_toml("[log]\nlevel = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/reindex.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reindex.toml");

        let mut config = Config::default();
        config.log.level = "reindex=debug".to_owned();
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}
