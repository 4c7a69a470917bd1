//! Chained workspaces
//!
//! A workspace root carries a marker file listing the source spaces it was
//! built from. Underlay workspaces are discovered from explicit paths or the
//! prefix path environment variable.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::config::defaults::{ENV_PREFIX_PATH, SOURCE_SPACE_SEPARATOR, WORKSPACE_MARKER};
use crate::error::WorkspaceError;
use crate::infra::filesystem;

/// Resolve workspaces and their source spaces
///
/// Without explicit `paths` the prefix path environment variable is read.
/// Paths without a workspace marker are ignored; every kept path is
/// followed by the source spaces listed in its marker.
pub fn get_spaces(paths: Option<&[PathBuf]>) -> Result<Vec<PathBuf>, WorkspaceError> {
    let from_env;
    let paths = match paths {
        Some(paths) => paths,
        None => {
            let value = std::env::var_os(ENV_PREFIX_PATH).ok_or_else(|| WorkspaceError::NoPrefixPath {
                variable: ENV_PREFIX_PATH.to_string(),
            })?;
            from_env = if value.is_empty() {
                Vec::new()
            } else {
                std::env::split_paths(&value).collect::<Vec<_>>()
            };
            &from_env[..]
        }
    };

    let mut spaces = Vec::new();
    for path in paths {
        let marker = path.join(WORKSPACE_MARKER);
        if !marker.is_file() {
            tracing::debug!("ignoring {} without workspace marker", path.display());
            continue;
        }
        spaces.push(path.clone());

        let data = filesystem::read_file(&marker).map_err(|e| WorkspaceError::Crawl {
            path: marker.clone(),
            error: e.to_string(),
        })?;
        let data = data.trim();
        if !data.is_empty() {
            spaces.extend(data.split(SOURCE_SPACE_SEPARATOR).map(PathBuf::from));
        }
    }
    Ok(spaces)
}

fn starts_with_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(MAIN_SEPARATOR) || rest.starts_with('/'))
}

/// Group `paths` by the first of `prefixes` they fall under
///
/// Paths keep their relative order within a group; paths matching no
/// prefix come last. Comparison is textual.
pub fn order_paths(paths: &[PathBuf], prefixes: &[PathBuf]) -> Vec<PathBuf> {
    let mut groups: Vec<Vec<PathBuf>> = vec![Vec::new(); prefixes.len() + 1];
    for path in paths {
        let text = path.to_string_lossy();
        let index = prefixes
            .iter()
            .position(|prefix| starts_with_prefix(&text, &prefix.to_string_lossy()))
            .unwrap_or(prefixes.len());
        groups[index].push(path.clone());
    }
    groups.into_iter().flatten().collect()
}

/// Whether `path` is the root of a workspace
pub fn is_workspace(path: &Path) -> bool {
    filesystem::has_marker(path, WORKSPACE_MARKER)
}
