//! Bridge configuration
//!
//! This module provides the TOML-backed [`BridgeConfig`]:
//! - Defaults written on first load
//! - Manual reload capability
//! - Paths resolved from the project directory
//!
//! # Example
//!
//! ```ignore
//! use rsbridge_core::BridgeConfig;
//!
//! let config = BridgeConfig::load().unwrap_or_default();
//! println!("Poll timeout: {}ms", config.poll_timeout_ms);
//! ```

mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use loader::{config_path, content_dir, project_dir, PROJECT_DIR_ENV};

use crate::camera::DistanceUnit;

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Could not determine the project directory
    #[error("Config directory not available - could not resolve project path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Bridge configuration.
///
/// Loaded from `<project>/Config/rsbridge.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Publish one scene per container in addition to the persistent scene
    pub generate_scenes_from_levels: bool,

    /// Poll timeout while at least one sink is active
    pub poll_timeout_ms: u32,

    /// Distance unit of the host scene
    pub distance_unit: DistanceUnit,

    /// Schema file, relative to the content directory
    pub schema_file: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            generate_scenes_from_levels: true,
            poll_timeout_ms: 500,
            distance_unit: DistanceUnit::Centimeters,
            schema_file: "RenderStream/schema.json".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load config from the project, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load config from `path`, creating default if missing.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded bridge config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default bridge config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to the project.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&config_path()?)
    }

    /// Save config to `path`.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved bridge config to {:?}", path);
        Ok(())
    }

    /// Reload config from `path`.
    ///
    /// Updates self with the current file contents.
    pub fn reload_from(&mut self, path: &Path) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded bridge config from {:?}", path);
        Ok(())
    }

    /// Absolute path of the schema file under `content`
    pub fn schema_path(&self, content: &Path) -> PathBuf {
        content.join(&self.schema_file)
    }
}
