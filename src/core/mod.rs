//! Core business logic module
//!
//! This module contains the business logic of orderly. Crawling and other
//! filesystem access live in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`dependency`] - Dependency declarations and version constraints
//! - [`project`] - Project descriptors
//! - [`manifest`] - Manifest (project.toml) parsing and validation
//! - [`resolver`] - Dependency resolution and sequencing
//! - [`order`] - Workspace build order with underlays and filters
//! - [`check`] - Workspace validation
//! - [`version`] - Version bumping
//! - [`export`] - CMake export
//! - [`global_config`] - Global configuration management

pub mod check;
pub mod dependency;
pub mod export;
pub mod global_config;
pub mod manifest;
pub mod order;
pub mod project;
pub mod resolver;
pub mod version;
