//! Global configuration management
//!
//! Reads global settings from `config.toml` in the config directory: the
//! default project filters, underlay workspaces and output preferences.
//! Command-line flags take precedence over every value here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::order::ProjectFilter;
use crate::infra::dirs::OrderlyDirs;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Global configuration for orderly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Ordering defaults
    #[serde(default)]
    pub order: OrderConfig,

    /// Output preferences
    #[serde(default)]
    pub output: OutputConfig,
}

/// Ordering defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderConfig {
    /// Projects ordered when no whitelist is passed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub whitelist: Vec<String>,

    /// Projects skipped when no blacklist is passed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blacklist: Vec<String>,

    /// Underlay workspaces used when none are passed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub underlays: Vec<PathBuf>,
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Enable quiet mode
    pub quiet: Option<bool>,

    /// Enable JSON output
    pub json: Option<bool>,
}

fn pick<T: Clone>(cli: &[T], config: &[T]) -> Vec<T> {
    if cli.is_empty() {
        config.to_vec()
    } else {
        cli.to_vec()
    }
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// A missing config file yields the default configuration.
    pub fn load(dirs: &OrderlyDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let config = toml::from_str(&content).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        tracing::debug!("loaded global config from {}", path.display());
        Ok(config)
    }

    /// Effective project filter; non-empty command-line lists win
    #[must_use]
    pub fn filter(&self, whitelist: &[String], blacklist: &[String]) -> ProjectFilter {
        ProjectFilter::new(
            pick(whitelist, &self.order.whitelist),
            pick(blacklist, &self.order.blacklist),
        )
    }

    /// Effective underlay workspaces; a non-empty command-line list wins
    #[must_use]
    pub fn underlays(&self, cli: &[PathBuf]) -> Vec<PathBuf> {
        pick(cli, &self.order.underlays)
    }

    /// Effective quiet flag
    #[must_use]
    pub fn quiet(&self, cli: bool) -> bool {
        cli || self.output.quiet.unwrap_or(false)
    }

    /// Effective JSON flag
    #[must_use]
    pub fn json(&self, cli: bool) -> bool {
        cli || self.output.json.unwrap_or(false)
    }
}
