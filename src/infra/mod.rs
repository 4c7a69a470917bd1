//! Infrastructure layer
//!
//! Handles filesystem access: crawling workspaces, reading markers and
//! locating the configuration directory.

pub mod crawler;
pub mod dirs;
pub mod filesystem;
pub mod workspaces;
