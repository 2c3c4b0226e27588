//! YAML application configuration
//!
//! Loaded from `config/<env>.yaml`: logging settings plus asset precision
//! entries that overlay the built-in asset table.

use crate::core_types::{AssetCode, DecimalDigits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Assets added to (or overriding) the built-in registry
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
}

/// One registry entry as written in YAML.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AssetConfig {
    pub asset_id: AssetCode,
    #[serde(default)]
    pub name: String,
    pub decimals: DecimalDigits,
    /// Defaults to `decimals`
    #[serde(default)]
    pub display_decimals: Option<u32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "asset_amount.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            assets: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::load_from(format!("config/{}.yaml", env))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
