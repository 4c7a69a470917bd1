//! Dependency resolution
//!
//! Computes the build order of a workspace. Each project is wrapped in an
//! [`OrderingNode`] that carries the set of projects which must be built
//! before it. That set contains the direct build and build-tool dependencies
//! plus the recursive run dependencies of those, restricted to the projects
//! of the graph. Message generators and everything they need are sequenced
//! first; ties are broken alphabetically so the order is reproducible.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::project::ProjectDescriptor;

/// A project together with its ordering state
#[derive(Debug, Clone)]
pub struct OrderingNode<'a> {
    project: &'a ProjectDescriptor,
    path: &'a Path,
    depends_for_order: BTreeSet<String>,
    is_prioritized: bool,
}

impl<'a> OrderingNode<'a> {
    fn new(path: &'a Path, project: &'a ProjectDescriptor) -> Self {
        Self {
            project,
            path,
            depends_for_order: BTreeSet::new(),
            is_prioritized: false,
        }
    }

    pub fn name(&self) -> &'a str {
        self.project.name()
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    pub fn project(&self) -> &'a ProjectDescriptor {
        self.project
    }

    /// Projects that have to be sequenced before this one
    pub fn depends_for_order(&self) -> &BTreeSet<String> {
        &self.depends_for_order
    }

    pub fn is_prioritized(&self) -> bool {
        self.is_prioritized
    }
}

/// One entry of a computed build order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderedEntry {
    /// A project to build
    Project {
        path: PathBuf,
        project: ProjectDescriptor,
    },
    /// Terminal entry listing the projects involved in a cycle
    Cycle { members: String },
}

impl OrderedEntry {
    pub fn project(&self) -> Option<&ProjectDescriptor> {
        match self {
            Self::Project { project, .. } => Some(project),
            Self::Cycle { .. } => None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Project { path, .. } => Some(path),
            Self::Cycle { .. } => None,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }
}

impl fmt::Display for OrderedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project { path, project } => {
                write!(f, "{} ({})", project.name(), path.display())
            }
            Self::Cycle { members } => write!(f, "cycle: {members}"),
        }
    }
}

/// Projects of one ordering run, keyed by name
///
/// A graph is built fresh for every ordering call and borrows the descriptors
/// it orders; descriptors themselves are never modified.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceGraph<'a> {
    nodes: BTreeMap<String, OrderingNode<'a>>,
}

impl<'a> WorkspaceGraph<'a> {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project, returning the node it replaced if the name was taken
    pub fn insert(
        &mut self,
        path: &'a Path,
        project: &'a ProjectDescriptor,
    ) -> Option<OrderingNode<'a>> {
        self.nodes
            .insert(project.name().to_string(), OrderingNode::new(path, project))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&OrderingNode<'a>> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Compute the order dependencies of every node and mark generator
    /// prerequisites, leaving the graph ready for [`Self::sequence`]
    pub fn resolve(&mut self) {
        let names: Vec<String> = self.nodes.keys().cloned().collect();
        for name in &names {
            self.compute_ordering_dependencies(name);
        }
        self.propagate_generator_priority();
    }

    /// Set the order dependencies of the node `name`
    ///
    /// For every build or build-tool dependency present in the graph, the
    /// dependency and its recursive run dependencies are added. External
    /// names are ignored.
    pub fn compute_ordering_dependencies(&mut self, name: &str) {
        let Some(node) = self.nodes.get(name) else {
            return;
        };
        let project = node.project;
        let mut depends = BTreeSet::new();

        for metaproject in self.metaproject_dependencies(name) {
            tracing::warn!(
                "project \"{}\" should not depend on metaproject \"{metaproject}\" but on its projects instead",
                project.name()
            );
        }

        for dep in project.builddeps().iter().chain(project.buildtooldeps()) {
            if let Some(target) = self.nodes.get(&dep.name) {
                self.add_recursive_rundeps(target, &mut depends);
            }
        }

        if let Some(node) = self.nodes.get_mut(name) {
            node.depends_for_order = depends;
        }
    }

    /// Metaprojects in the graph that the project `name` build depends on
    ///
    /// Empty for metaprojects, which may group other metaprojects.
    pub fn metaproject_dependencies(&self, name: &str) -> Vec<&str> {
        let Some(node) = self.nodes.get(name) else {
            return Vec::new();
        };
        if node.project.is_metaproject() {
            return Vec::new();
        }
        node.project
            .builddeps()
            .iter()
            .chain(node.project.buildtooldeps())
            .filter_map(|dep| self.nodes.get(&dep.name))
            .filter(|target| target.project.is_metaproject())
            .map(|target| target.project.name())
            .collect()
    }

    fn add_recursive_rundeps(&self, node: &OrderingNode<'a>, depends: &mut BTreeSet<String>) {
        depends.insert(node.name().to_string());
        for dep in node.project.rundeps() {
            if depends.contains(&dep.name) {
                continue;
            }
            if let Some(target) = self.nodes.get(&dep.name) {
                self.add_recursive_rundeps(target, depends);
            }
        }
    }

    /// Mark message generators and everything they need to be built first
    pub fn propagate_generator_priority(&mut self) {
        let mut queue: VecDeque<String> = VecDeque::new();
        for (name, node) in &mut self.nodes {
            if node.project.message_generator().is_some() {
                node.is_prioritized = true;
                queue.push_back(name.clone());
            }
        }

        while let Some(name) = queue.pop_front() {
            let depends: Vec<String> = match self.nodes.get(&name) {
                Some(node) => node.depends_for_order.iter().cloned().collect(),
                None => continue,
            };
            for dep in depends {
                if let Some(node) = self.nodes.get_mut(&dep) {
                    if !node.is_prioritized {
                        node.is_prioritized = true;
                        queue.push_back(dep);
                    }
                }
            }
        }
    }

    /// Consume the graph and produce the build order
    ///
    /// Repeatedly picks the alphabetically first project without pending
    /// dependencies, preferring prioritized ones. When no project is ready,
    /// a single [`OrderedEntry::Cycle`] naming the projects that are likely
    /// part of the cycle terminates the result.
    pub fn sequence(mut self) -> Vec<OrderedEntry> {
        let mut ordered = Vec::with_capacity(self.nodes.len());

        while !self.nodes.is_empty() {
            let Some(name) = self.next_ready() else {
                let members = reduce_cycle_set(&self.nodes).join(", ");
                tracing::debug!("circular dependency among: {members}");
                ordered.push(OrderedEntry::Cycle { members });
                break;
            };

            if let Some(node) = self.nodes.remove(&name) {
                tracing::debug!("sequenced {name}");
                ordered.push(OrderedEntry::Project {
                    path: node.path.to_path_buf(),
                    project: node.project.clone(),
                });
            }
            // Free dependents right away, the next pick depends on it
            for node in self.nodes.values_mut() {
                node.depends_for_order.remove(&name);
            }
        }

        ordered
    }

    fn next_ready(&self) -> Option<String> {
        let mut prioritized: Vec<&String> = Vec::new();
        let mut others: Vec<&String> = Vec::new();
        for (name, node) in &self.nodes {
            if node.depends_for_order.is_empty() {
                if node.is_prioritized {
                    prioritized.push(name);
                } else {
                    others.push(name);
                }
            }
        }

        let mut candidates = if prioritized.is_empty() {
            others
        } else {
            prioritized
        };
        candidates.sort();
        candidates.first().map(|name| (*name).clone())
    }
}

/// Narrow the stuck projects down to those that may be part of a cycle
///
/// Projects nothing else waits for cannot be part of a cycle; they are
/// dropped until the set of depended-on names stops changing.
fn reduce_cycle_set(nodes: &BTreeMap<String, OrderingNode<'_>>) -> Vec<String> {
    let mut remaining: BTreeMap<&str, &BTreeSet<String>> = nodes
        .iter()
        .map(|(name, node)| (name.as_str(), &node.depends_for_order))
        .collect();
    let mut last_depended: Option<BTreeSet<&str>> = None;

    while !remaining.is_empty() {
        let depended: BTreeSet<&str> = remaining
            .values()
            .flat_map(|depends| depends.iter().map(String::as_str))
            .collect();
        remaining.retain(|name, _| depended.contains(name));
        if last_depended.as_ref() == Some(&depended) {
            break;
        }
        last_depended = Some(depended);
    }

    remaining.keys().map(|name| (*name).to_string()).collect()
}
