//! Orderly - deterministic build order for multi-project workspaces
//!
//! This library crawls a source tree for project manifests (`project.toml`),
//! validates them and computes the order in which the projects have to be
//! built, taking underlay workspaces, message generators and cycles into
//! account.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic: manifests, dependency resolution, ordering
//! - [`infra`] - Infrastructure layer (filesystem, crawling, directories)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
