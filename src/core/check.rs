//! Check command logic
//!
//! Validates a workspace as a whole: computes the build order, looks for
//! cycles, version drift and metaproject rule violations, and reports
//! everything found instead of stopping at the first problem.

use std::collections::BTreeMap;

use semver::Version;
use serde::Serialize;

use crate::core::order::{order_projects, ProjectFilter};
use crate::core::project::{DependencyKind, ProjectDescriptor, ProjectMap};
use crate::core::resolver::OrderedEntry;
use crate::error::OrderError;
use crate::infra::crawler::verify_equal_project_versions;

/// Result of the check operation
#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// Projects in build order
    pub build_order: Vec<String>,
    /// Projects likely involved in a dependency cycle
    pub cycle: Option<String>,
    /// Shared version of all projects, when they agree
    pub version: Option<String>,
    /// Version disagreement between projects
    pub version_mismatch: Option<String>,
    /// Metaprojects breaking the metaproject rules
    pub metaproject_violations: Vec<String>,
    /// Warnings encountered during check
    pub warnings: Vec<String>,
}

impl CheckResult {
    /// Create a new check result
    pub fn new() -> Self {
        Self {
            build_order: Vec::new(),
            cycle: None,
            version: None,
            version_mismatch: None,
            metaproject_violations: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if all validations passed
    pub fn is_valid(&self) -> bool {
        self.cycle.is_none() && self.metaproject_violations.is_empty()
    }
}

impl Default for CheckResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the projects of a workspace together with its underlay
pub fn check_workspace(projects: &ProjectMap, underlay: &ProjectMap) -> Result<CheckResult, OrderError> {
    let mut result = CheckResult::new();

    for entry in order_projects(projects, underlay, &ProjectFilter::default())? {
        match entry {
            OrderedEntry::Project { project, .. } => result.build_order.push(project.name().to_string()),
            OrderedEntry::Cycle { members } => result.cycle = Some(members),
        }
    }

    match verify_equal_project_versions(projects) {
        Ok(version) => result.version = version,
        Err(e) => result.version_mismatch = Some(e.to_string()),
    }

    for project in projects.values().filter(|p| p.is_metaproject()) {
        if !project.has_buildtooldep_on_core_tool() {
            result.metaproject_violations.push(format!(
                "Metaproject \"{}\" must buildtool_depend on {}",
                project.name(),
                crate::config::defaults::CORE_BUILD_TOOL
            ));
        }
        if project.has_invalid_metaproject_dependencies() {
            result.metaproject_violations.push(format!(
                "Metaproject \"{}\" must only declare run dependencies besides the build tool",
                project.name()
            ));
        }
    }

    let mut known: BTreeMap<&str, &ProjectDescriptor> =
        underlay.values().map(|p| (p.name(), p)).collect();
    known.extend(projects.values().map(|p| (p.name(), p)));

    for project in projects.values() {
        dependency_warnings(project, &known, &mut result.warnings);
    }

    Ok(result)
}

fn dependency_warnings(
    project: &ProjectDescriptor,
    known: &BTreeMap<&str, &ProjectDescriptor>,
    warnings: &mut Vec<String>,
) {
    for kind in DependencyKind::ALL {
        for dep in project.dependencies(kind) {
            let Some(target) = known.get(dep.name.as_str()) else {
                continue;
            };

            if let Some(note) = target.deprecated() {
                let suffix = if note.is_empty() {
                    String::new()
                } else {
                    format!(": {note}")
                };
                warnings.push(format!(
                    "\"{}\" depends on deprecated project \"{}\"{suffix}",
                    project.name(),
                    target.name()
                ));
            }

            if matches!(kind, DependencyKind::Build | DependencyKind::BuildTool)
                && !project.is_metaproject()
                && target.is_metaproject()
            {
                warnings.push(format!(
                    "\"{}\" should not depend on metaproject \"{}\" but on its projects instead",
                    project.name(),
                    target.name()
                ));
            }

            let Ok(Some(req)) = dep.version_req() else {
                continue;
            };
            // Versions like 1.0_1 are valid project versions but not semver
            let Ok(version) = Version::parse(target.version()) else {
                continue;
            };
            if !req.matches(&version) {
                warnings.push(format!(
                    "\"{}\" requires {} {req} but version {version} is available",
                    project.name(),
                    dep.name
                ));
            }
        }
    }
}
