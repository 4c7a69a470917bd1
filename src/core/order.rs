//! Workspace build order
//!
//! Combines the projects of a workspace with those of its underlay
//! workspaces, orders them and keeps only the workspace's own projects in
//! the result. Underlay projects take part in ordering so dependencies that
//! pass through them are still respected.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::project::ProjectMap;
use crate::core::resolver::{OrderedEntry, WorkspaceGraph};
use crate::error::{OrderError, OrderlyError};
use crate::infra::crawler::{self, CrawlOptions};

/// Name filters applied to the primary workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    /// When non-empty, only these projects are ordered
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// Projects never ordered
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl ProjectFilter {
    pub fn new(whitelist: Vec<String>, blacklist: Vec<String>) -> Self {
        Self {
            whitelist,
            blacklist,
        }
    }

    /// Whether the project `name` passes the filter
    pub fn allows(&self, name: &str) -> bool {
        (self.whitelist.is_empty() || self.whitelist.iter().any(|n| n == name))
            && !self.blacklist.iter().any(|n| n == name)
    }
}

/// Order the projects of a workspace
///
/// `projects` is filtered first; duplicate names among the remaining
/// projects are an error. Underlay projects whose name is provided by the
/// workspace are ignored; the others are ordered along and then dropped
/// from the result. A trailing [`OrderedEntry::Cycle`] is kept.
pub fn order_projects(
    projects: &ProjectMap,
    underlay: &ProjectMap,
    filter: &ProjectFilter,
) -> Result<Vec<OrderedEntry>, OrderError> {
    let mut graph = WorkspaceGraph::new();

    for (path, project) in projects {
        if !filter.allows(project.name()) {
            tracing::debug!("filtered out {}", project.name());
            continue;
        }
        if let Some(previous) = graph.insert(path, project) {
            return Err(OrderError::DuplicateProject {
                name: project.name().to_string(),
                first: previous.path().display().to_string(),
                second: path.display().to_string(),
            });
        }
    }

    let mut underlay_only = BTreeSet::new();
    for (path, project) in underlay {
        if graph.contains(project.name()) {
            continue;
        }
        graph.insert(path, project);
        underlay_only.insert(project.name());
    }

    graph.resolve();
    let entries = graph
        .sequence()
        .into_iter()
        .filter(|entry| {
            entry
                .project()
                .map_or(true, |project| !underlay_only.contains(project.name()))
        })
        .collect();
    Ok(entries)
}

/// Crawl `root` and the underlay workspaces, then order the projects of `root`
///
/// For a project name provided by several underlay workspaces, the
/// workspace listed first wins.
pub async fn topological_order(
    root: &Path,
    filter: &ProjectFilter,
    underlay_workspaces: &[PathBuf],
) -> Result<Vec<OrderedEntry>, OrderlyError> {
    let options = CrawlOptions::default();
    let mut workspaces = Vec::with_capacity(underlay_workspaces.len() + 1);
    workspaces.push(root.to_path_buf());
    workspaces.extend(underlay_workspaces.iter().cloned());

    let mut crawled = crawler::crawl_workspaces(&workspaces, &options).await?;
    let projects = crawled.remove(0);
    let underlay = crawler::merge_underlays(underlay_workspaces, crawled);
    tracing::debug!(
        "ordering {} projects with {} underlay projects",
        projects.len(),
        underlay.len()
    );

    Ok(order_projects(&projects, &underlay, filter)?)
}
