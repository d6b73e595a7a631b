//! Configuration system for dynmsg
//!
//! This module provides:
//! - [`CoreConfig`] - gateway-level settings (`configs/core.toml`)
//! - [`SchemaCatalog`] - message contracts known at startup (`configs/catalog.toml`)
//! - TOML file format, auto-generation of a default core config, manual reload
//!
//! # Example
//!
//! ```ignore
//! use dynmsg_core::config::{CoreConfig, SchemaCatalog};
//!
//! let config = CoreConfig::load().unwrap_or_default();
//! if let Some(path) = config.catalog_file()? {
//!     let catalog = SchemaCatalog::load_from(&path)?;
//!     println!("{} contracts", catalog.schemas.len());
//! }
//! ```

mod catalog;
mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use catalog::SchemaCatalog;
pub use loader::{base_dir, catalog_path, configs_dir, core_config_path, resolve_in, HOME_ENV};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory
    #[error("Config directory not available - could not resolve base path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Core gateway configuration.
///
/// Loaded from `configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// `tracing` filter directive, e.g. `"dynmsg_engine=trace,info"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,

    /// Schema catalog to synthesize at startup, relative to the configs dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            log_filter: None,
            catalog: None,
        }
    }
}

impl CoreConfig {
    /// Load core config from file, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_or_create(&core_config_path()?)
    }

    /// Load config from `path`, writing a default config there if missing.
    pub fn load_or_create(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let config = Self::load_from(path)?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Load config from `path`.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save core config to file.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&core_config_path()?)
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload core config from file.
    pub fn reload(&mut self) -> ConfigResult<()> {
        let path = core_config_path()?;
        *self = Self::load_from(&path)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }

    /// Absolute path of the configured catalog, if any
    pub fn catalog_file(&self) -> ConfigResult<Option<PathBuf>> {
        match &self.catalog {
            Some(path) => Ok(Some(resolve_in(&configs_dir()?, path))),
            None => Ok(None),
        }
    }

    /// Default filter directive when neither `RUST_LOG` nor `log_filter` is set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
