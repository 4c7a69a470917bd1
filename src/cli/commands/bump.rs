//! Bump command implementation
//!
//! Implements `orderly bump` to raise the shared version of all projects.

use std::path::PathBuf;

use anyhow::{bail, Result};

use super::crawl;
use crate::cli::output::{self, print_json, OutputConfig};
use crate::core::version::{bump_version, update_versions, BumpPart};
use crate::infra::crawler::verify_equal_project_versions;

/// Execute the bump command
pub async fn execute(root: PathBuf, part: BumpPart) -> Result<()> {
    let projects = crawl(&root).await?;
    let Some(current) = verify_equal_project_versions(&projects)? else {
        bail!("No projects found in {}", root.display());
    };

    let new_version = bump_version(&current, part)?;
    let dirs: Vec<PathBuf> = projects.keys().map(|path| root.join(path)).collect();
    update_versions(&dirs, &new_version)?;
    tracing::info!("bumped {part} version of {} projects", projects.len());

    if OutputConfig::current().json {
        let names: Vec<&str> = projects.values().map(|p| p.name()).collect();
        print_json(&serde_json::json!({
            "old_version": current,
            "new_version": new_version,
            "projects": names,
        }))?;
    } else {
        output::success(&format!(
            "Bumped {} projects from {current} to {new_version}",
            projects.len()
        ));
    }
    Ok(())
}
