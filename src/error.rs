//! Error types for orderly
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Manifest (project.toml) errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No manifest at the given location
    #[error("Path '{path}' is neither a directory containing a 'project.toml' file nor a file")]
    NotFound { path: PathBuf },

    /// Manifest could not be read
    #[error("Failed to read manifest '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Manifest is not valid TOML or does not match the schema
    #[error("Failed to parse manifest '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Manifest parsed but violates the project rules
    #[error("Invalid project manifest '{path}':{}", format_list(.errors))]
    Invalid { path: PathBuf, errors: Vec<String> },
}

/// Workspace discovery errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Several manifests declare the same project name
    #[error("{}", format_duplicates(.duplicates))]
    DuplicateNames {
        duplicates: Vec<(String, Vec<PathBuf>)>,
    },

    /// Projects in one workspace disagree on their version
    #[error("Two projects have different version numbers ({found} != {expected}):\n- {found_path}\n- {expected_path}")]
    VersionMismatch {
        expected: String,
        found: String,
        expected_path: PathBuf,
        found_path: PathBuf,
    },

    /// Neither explicit paths nor the prefix path variable were given
    #[error("Neither the environment variable {variable} is set nor was a list of paths passed")]
    NoPrefixPath { variable: String },

    /// Directory walk failed
    #[error("Failed to crawl '{path}': {error}")]
    Crawl { path: PathBuf, error: String },

    /// A manifest found while crawling is unusable
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Build order errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    /// Two primary projects share a name
    #[error("Two projects with the same name \"{name}\" in the workspace:\n- {first}\n- {second}")]
    DuplicateProject {
        name: String,
        first: String,
        second: String,
    },

    /// The ordering ended in a cycle sentinel
    #[error("Circular dependency in subset of projects: {members}")]
    Cycle { members: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Top-level orderly error type
#[derive(Error, Debug)]
pub enum OrderlyError {
    /// Manifest error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Workspace error
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// Order error
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Version error
    #[error("Version error: {0}")]
    Version(#[from] crate::core::version::VersionError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Global configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::global_config::GlobalConfigError),
}

fn format_list(errors: &[String]) -> String {
    errors.iter().map(|e| format!("\n- {e}")).collect()
}

fn format_duplicates(duplicates: &[(String, Vec<PathBuf>)]) -> String {
    duplicates
        .iter()
        .map(|(name, paths)| {
            let listed: String = paths
                .iter()
                .map(|p| format!("\n- {}", p.display()))
                .collect();
            format!("Multiple projects found with the same name \"{name}\":{listed}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
