//! Platform-specific directory management
//!
//! Provides the configuration directory of orderly. Follows the XDG Base
//! Directory Specification on Linux and standard locations on macOS.
//!
//! The `ORDERLY_CONFIG_DIR` environment variable overrides the default.

use std::env;
use std::path::PathBuf;

use crate::config::defaults::ENV_CONFIG_DIR;

/// Application name used in directory paths
const APP_NAME: &str = "orderly";

/// Name of the global configuration file
const CONFIG_FILE: &str = "config.toml";

/// Platform-specific directory provider for orderly
#[derive(Debug, Clone)]
pub struct OrderlyDirs {
    config_dir: PathBuf,
}

impl OrderlyDirs {
    /// Create a new `OrderlyDirs` instance
    ///
    /// Checks the environment first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Directory provider rooted at an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/orderly` or `~/.config/orderly`
    /// - macOS: `~/Library/Application Support/orderly`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Path of `config.toml` in the config directory
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for OrderlyDirs {
    fn default() -> Self {
        Self::new()
    }
}
