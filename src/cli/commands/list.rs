//! List command implementation
//!
//! Implements `orderly list` to show the projects found in a workspace.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use super::crawl;
use crate::cli::output::{self, print_json, OutputConfig};

#[derive(Serialize)]
struct ListedProject<'a> {
    path: &'a std::path::Path,
    name: &'a str,
    version: &'a str,
}

/// Execute the list command
pub async fn execute(root: PathBuf) -> Result<()> {
    let projects = crawl(&root).await?;

    if OutputConfig::current().json {
        let listed: Vec<ListedProject<'_>> = projects
            .iter()
            .map(|(path, project)| ListedProject {
                path,
                name: project.name(),
                version: project.version(),
            })
            .collect();
        return print_json(&listed);
    }

    if projects.is_empty() {
        output::info(&format!("No projects found in {}", root.display()));
        return Ok(());
    }

    let width = projects
        .keys()
        .map(|p| p.display().to_string().len())
        .max()
        .unwrap_or(0);
    for (path, project) in &projects {
        let path = path.display().to_string();
        println!("{path:<width$}  {} ({})", project.name(), project.version());
    }
    Ok(())
}
