//! Order command implementation
//!
//! Implements `orderly order` to print the build order of a workspace.

use anyhow::{Context, Result};

use super::{load_global_config, resolve_root, resolve_underlays, WorkspaceArgs};
use crate::cli::output::{create_spinner, print_json, OutputConfig};
use crate::core::order::topological_order;
use crate::core::resolver::OrderedEntry;
use crate::error::OrderError;

/// Execute the order command
///
/// Fails after printing the order when it ends in a cycle.
pub async fn execute(args: WorkspaceArgs, paths_only: bool) -> Result<()> {
    let root = resolve_root(args.root)?;
    let config = load_global_config()?;
    let filter = config.filter(&args.whitelist, &args.blacklist);
    let underlays = resolve_underlays(&args.underlay, &config)?;

    tracing::info!("Ordering projects in {}", root.display());
    let spinner = create_spinner("Crawling workspaces...");
    let entries = topological_order(&root, &filter, &underlays).await;
    spinner.finish_and_clear();
    let entries =
        entries.with_context(|| format!("Failed to order projects in {}", root.display()))?;

    if OutputConfig::current().json {
        print_json(&entries)?;
    } else {
        for entry in &entries {
            match entry {
                OrderedEntry::Project { path, project } => {
                    if paths_only {
                        println!("{}", path.display());
                    } else {
                        println!("{}", project.name());
                    }
                }
                OrderedEntry::Cycle { .. } => {}
            }
        }
    }

    if let Some(OrderedEntry::Cycle { members }) = entries.last() {
        return Err(OrderError::Cycle {
            members: members.clone(),
        }
        .into());
    }
    Ok(())
}
