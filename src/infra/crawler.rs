//! Workspace crawler
//!
//! Finds project manifests below a workspace root and parses them into a
//! [`ProjectMap`]. Crawling several workspaces runs on blocking worker
//! threads so independent trees are walked concurrently.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::defaults::{IGNORE_MARKER, MANIFEST_FILENAME};
use crate::core::manifest::parse_project;
use crate::core::project::{ProjectDescriptor, ProjectMap};
use crate::error::WorkspaceError;
use crate::infra::filesystem::has_marker;
use crate::infra::workspaces::is_workspace;

/// Options controlling which directories are crawled
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    /// Directories not to descend into
    pub exclude_paths: Vec<PathBuf>,
    /// Skip nested workspaces (directories holding the workspace marker)
    pub exclude_subspaces: bool,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Find the directories below `base` that contain a project manifest
///
/// Returned paths are relative to `base` and sorted. A directory holding a
/// manifest is not searched further; neither are hidden directories nor
/// directories containing the ignore marker.
pub fn find_project_paths(base: &Path, options: &CrawlOptions) -> Result<Vec<PathBuf>, WorkspaceError> {
    let excluded: BTreeSet<PathBuf> = options.exclude_paths.iter().map(|p| canonical(p)).collect();
    let mut paths = Vec::new();

    let mut walker = WalkDir::new(base)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| WorkspaceError::Crawl {
            path: base.to_path_buf(),
            error: e.to_string(),
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let dir = entry.path();

        if entry.depth() > 0 && is_hidden(&entry) {
            walker.skip_current_dir();
            continue;
        }
        if has_marker(dir, IGNORE_MARKER)
            || (!excluded.is_empty() && excluded.contains(&canonical(dir)))
            || (options.exclude_subspaces && entry.depth() > 0 && is_workspace(dir))
        {
            tracing::debug!("skipping {}", dir.display());
            walker.skip_current_dir();
            continue;
        }
        if has_marker(dir, MANIFEST_FILENAME) {
            let relative = dir.strip_prefix(base).unwrap_or(dir);
            paths.push(if relative.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                relative.to_path_buf()
            });
            walker.skip_current_dir();
        }
    }

    paths.sort();
    Ok(paths)
}

/// Find and parse every project below `base`
///
/// Fails when several manifests declare the same project name, listing
/// every duplicated name with all of its paths.
pub fn find_projects(base: &Path, options: &CrawlOptions) -> Result<ProjectMap, WorkspaceError> {
    let mut projects = ProjectMap::new();
    let mut by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for path in find_project_paths(base, options)? {
        let project = parse_project(&base.join(&path), path.clone())?;
        by_name
            .entry(project.name().to_string())
            .or_default()
            .push(path.clone());
        projects.insert(path, project);
    }

    let duplicates: Vec<(String, Vec<PathBuf>)> = by_name
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .collect();
    if !duplicates.is_empty() {
        return Err(WorkspaceError::DuplicateNames { duplicates });
    }

    tracing::debug!("found {} projects in {}", projects.len(), base.display());
    Ok(projects)
}

/// Check that all projects share one version and return it
pub fn verify_equal_project_versions(projects: &ProjectMap) -> Result<Option<String>, WorkspaceError> {
    let mut iter = projects.values();
    let Some(first) = iter.next() else {
        return Ok(None);
    };
    for project in iter {
        if project.version() != first.version() {
            return Err(WorkspaceError::VersionMismatch {
                expected: first.version().to_string(),
                found: project.version().to_string(),
                expected_path: first.path().to_path_buf(),
                found_path: project.path().to_path_buf(),
            });
        }
    }
    Ok(Some(first.version().to_string()))
}

/// Crawl several workspaces concurrently
///
/// Results are returned in the order of `workspaces`.
pub async fn crawl_workspaces(
    workspaces: &[PathBuf],
    options: &CrawlOptions,
) -> Result<Vec<ProjectMap>, WorkspaceError> {
    let tasks = workspaces.iter().cloned().map(|workspace| {
        let options = options.clone();
        async move {
            let root = workspace.clone();
            tokio::task::spawn_blocking(move || find_projects(&root, &options))
                .await
                .map_err(|e| WorkspaceError::Crawl {
                    path: workspace,
                    error: e.to_string(),
                })?
        }
    });
    futures::future::try_join_all(tasks).await
}

/// Merge crawled underlay workspaces into one map
///
/// When several workspaces provide a project of the same name, the one from
/// the workspace listed first wins. Keys are the project locations joined
/// onto their workspace root.
pub fn merge_underlays(workspaces: &[PathBuf], crawled: Vec<ProjectMap>) -> ProjectMap {
    let mut by_name: BTreeMap<String, (PathBuf, ProjectDescriptor)> = BTreeMap::new();
    for (workspace, projects) in workspaces.iter().zip(crawled).rev() {
        for (path, project) in projects {
            by_name.insert(project.name().to_string(), (workspace.join(path), project));
        }
    }
    by_name.into_values().collect()
}
