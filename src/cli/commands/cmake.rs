//! CMake command implementation
//!
//! Implements `orderly cmake` to export the build order for CMake.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{load_global_config, resolve_root, resolve_underlays, WorkspaceArgs};
use crate::cli::output;
use crate::core::export::ordered_projects_cmake;
use crate::core::order::topological_order;
use crate::infra::filesystem;

/// Execute the cmake command
///
/// A cycle is not an error here; it is written as a fatal CMake message.
pub async fn execute(args: WorkspaceArgs, output_file: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(args.root)?;
    let config = load_global_config()?;
    let filter = config.filter(&args.whitelist, &args.blacklist);
    let underlays = resolve_underlays(&args.underlay, &config)?;

    let entries = topological_order(&root, &filter, &underlays)
        .await
        .with_context(|| format!("Failed to order projects in {}", root.display()))?;
    let content = ordered_projects_cmake(&entries);

    match output_file {
        Some(path) => {
            filesystem::write_file(&path, &content)?;
            output::success(&format!("Wrote {}", path.display()));
        }
        None => print!("{content}"),
    }
    Ok(())
}
