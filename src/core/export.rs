//! CMake export
//!
//! Renders a computed build order and single project descriptors as CMake
//! `set(...)` declarations for build systems driven by CMake.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::core::dependency::Dependency;
use crate::core::resolver::OrderedEntry;
use crate::core::project::ProjectDescriptor;

const ORDERED_PROJECTS: &str = "ORDERLY_ORDERED_PROJECTS";
const ORDERED_PROJECT_PATHS: &str = "ORDERLY_ORDERED_PROJECT_PATHS";
const ORDERED_PROJECTS_IS_META: &str = "ORDERLY_ORDERED_PROJECTS_IS_META";
const MESSAGE_GENERATORS: &str = "ORDERLY_MESSAGE_GENERATORS";
const CURRENT_PROJECT: &str = "_ORDERLY_CURRENT_PROJECT";

/// Quote a value as a CMake string
fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{escaped}\"")
}

/// CMake declarations for a build order
///
/// A cycle entry turns into a fatal CMake error naming its members.
pub fn ordered_projects_cmake(entries: &[OrderedEntry]) -> String {
    let mut out = String::new();
    for variable in [
        ORDERED_PROJECTS,
        ORDERED_PROJECT_PATHS,
        ORDERED_PROJECTS_IS_META,
        MESSAGE_GENERATORS,
    ] {
        let _ = writeln!(out, "set({variable} \"\")");
    }

    for entry in entries {
        match entry {
            OrderedEntry::Project { path, project } => {
                let _ = writeln!(out, "list(APPEND {ORDERED_PROJECTS} {})", quote(project.name()));
                let _ = writeln!(
                    out,
                    "list(APPEND {ORDERED_PROJECT_PATHS} {})",
                    quote(&path.display().to_string())
                );
                let is_meta = if project.is_metaproject() { "TRUE" } else { "FALSE" };
                let _ = writeln!(out, "list(APPEND {ORDERED_PROJECTS_IS_META} \"{is_meta}\")");
                if project.message_generator().is_some() {
                    let _ = writeln!(out, "list(APPEND {MESSAGE_GENERATORS} {})", quote(project.name()));
                }
            }
            OrderedEntry::Cycle { members } => {
                let _ = writeln!(
                    out,
                    "message(FATAL_ERROR {})",
                    quote(&format!("Circular dependency in subset of projects:\n{members}"))
                );
            }
        }
    }
    out
}

fn dependency_values(key: &str, deps: &[Dependency], values: &mut BTreeMap<String, String>) {
    let names: Vec<String> = deps.iter().map(|d| quote(&d.name)).collect();
    values.insert(key.to_string(), names.join(" "));
    for dep in deps {
        for (op, version) in dep.constraints() {
            values.insert(
                format!("{key}_{}_{}", dep.name, op.key().to_uppercase()),
                quote(version),
            );
        }
    }
}

/// CMake variables describing one project
///
/// Every variable is prefixed with the project name; lines after the
/// current-project declaration are sorted by variable.
pub fn project_cmake(project: &ProjectDescriptor) -> String {
    let mut values = BTreeMap::new();
    values.insert("VERSION".to_string(), quote(project.version()));
    values.insert("MAINTAINER".to_string(), quote(&project.maintainers().join(", ")));
    dependency_values("BUILDDEPS", project.builddeps(), &mut values);
    dependency_values("BUILDTOOLDEPS", project.buildtooldeps(), &mut values);
    dependency_values("RUNDEPS", project.rundeps(), &mut values);
    let deprecated = match project.deprecated() {
        Some("") => "TRUE",
        Some(note) => note,
        None => "",
    };
    values.insert("DEPRECATED".to_string(), quote(deprecated));

    let mut out = format!("set({CURRENT_PROJECT} {})\n", quote(project.name()));
    for (key, value) in values {
        let _ = writeln!(out, "set({}_{key} {value})", project.name());
    }
    out
}
