//! Project variables command implementation
//!
//! Implements `orderly project-vars` to export one project for CMake.

use std::path::Path;

use anyhow::Result;

use crate::cli::output;
use crate::core::export::project_cmake;
use crate::core::manifest::parse_project;
use crate::infra::filesystem;

/// Execute the project-vars command
pub fn execute(manifest_dir: &Path, output_file: Option<&Path>) -> Result<()> {
    let project = parse_project(manifest_dir, manifest_dir)?;
    let content = project_cmake(&project);

    match output_file {
        Some(path) => {
            filesystem::write_file(path, &content)?;
            output::success(&format!("Wrote {}", path.display()));
        }
        None => print!("{content}"),
    }
    Ok(())
}
