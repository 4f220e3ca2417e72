//! Configuration types for the cmkgui web layer.
//!
//! This module provides the unified configuration used across all cmkgui crates.
//! Configuration is loaded from one YAML file and combined into a single
//! `GuiConfig` structure.
//!
//! # Sections
//!
//! - **var_dir**: Directory holding runtime state (the token file lives here)
//! - **token_store**: File name, lock timeout and verification touch interval
//! - **security_log**: Where authentication failures and token lifecycle events go
//! - **server**: Listen address and the public base URL used for share links
//! - **tags**: Host tag vocabulary used when describing rule conditions

pub mod security_log;
pub mod server;
pub mod tags;
pub mod token_store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use security_log::SecurityLogConfig;
pub use server::ServerConfig;
pub use tags::{AuxTagConfig, TagConfig, TagGroupConfig, TagValueConfig};
pub use token_store::{MAX_TOUCH_INTERVAL_SECS, TokenStoreConfig};

/// Complete cmkgui configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiConfig {
    /// Directory for runtime state such as the token file.
    #[serde(default = "default_var_dir")]
    pub var_dir: PathBuf,

    /// Token store settings.
    #[serde(default)]
    pub token_store: TokenStoreConfig,

    /// Security event log settings.
    #[serde(default)]
    pub security_log: SecurityLogConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Host tag vocabulary.
    #[serde(default)]
    pub tags: TagConfig,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            var_dir: default_var_dir(),
            token_store: TokenStoreConfig::default(),
            security_log: SecurityLogConfig::default(),
            server: ServerConfig::default(),
            tags: TagConfig::default(),
        }
    }
}

fn default_var_dir() -> PathBuf {
    PathBuf::from("var/check_mk/web")
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GuiConfig {
    /// Load configuration from a YAML file.
    ///
    /// Relative `var_dir` and `security_log.directory` entries are resolved
    /// against the directory containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if config.var_dir.is_relative() {
            config.var_dir = base_dir.join(&config.var_dir);
        }
        if config.security_log.directory.is_relative() {
            config.security_log.directory = base_dir.join(&config.security_log.directory);
        }

        Ok(config)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse fine but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_store.file_name.trim().is_empty() {
            return Err(ConfigError::Config(
                "token_store.file_name must not be empty".to_string(),
            ));
        }
        if self.token_store.file_name.contains('/') {
            return Err(ConfigError::Config(format!(
                "token_store.file_name must be a plain file name, got '{}'",
                self.token_store.file_name
            )));
        }
        if self.token_store.touch_interval_secs > MAX_TOUCH_INTERVAL_SECS {
            return Err(ConfigError::Config(format!(
                "token_store.touch_interval_secs must be at most {}, got {}",
                MAX_TOUCH_INTERVAL_SECS, self.token_store.touch_interval_secs
            )));
        }
        Ok(())
    }

    /// Full path of the token file (`<var_dir>/<file_name>`).
    pub fn token_store_path(&self) -> PathBuf {
        self.var_dir.join(&self.token_store.file_name)
    }

    /// Full path of the security event log.
    pub fn security_log_path(&self) -> PathBuf {
        self.security_log.directory.join(&self.security_log.file_name)
    }
}
