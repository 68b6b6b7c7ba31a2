//! JSON configuration.
//!
//! The config file is a JSON object with one section per tool, keyed by
//! package name:
//!
//! ```json
//! {
//!   "folio": {
//!     "extensionWhitelist": ["txt", "md"],
//!     "extensionBlacklist": ["lock"],
//!     "includeHiddenFiles": false
//!   }
//! }
//! ```
//!
//! Missing keys and a missing section fall back to the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{FilterPolicy, DEFAULT_WHITELIST};

/// Config file looked up when none is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Key of this tool's section in the config file.
pub const CONFIG_SECTION: &str = env!("CARGO_PKG_NAME");

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File filtering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub extension_whitelist: Vec<String>,
    pub extension_blacklist: Vec<String>,
    pub include_hidden_files: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension_whitelist: DEFAULT_WHITELIST.iter().map(|e| e.to_string()).collect(),
            extension_blacklist: Vec::new(),
            include_hidden_files: false,
        }
    }
}

impl Config {
    /// Parse a config document and extract this tool's section.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let document: serde_json::Value = serde_json::from_str(text)?;
        match document.get(CONFIG_SECTION) {
            Some(section) => Config::deserialize(section),
            None => Ok(Config::default()),
        }
    }

    /// Load from a file that must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a file, using defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Filter policy described by this config.
    pub fn policy(&self) -> FilterPolicy {
        FilterPolicy::new(
            self.extension_whitelist.as_slice(),
            self.extension_blacklist.as_slice(),
            self.include_hidden_files,
        )
    }
}
