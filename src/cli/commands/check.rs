//! Check command implementation
//!
//! Implements `orderly check` to validate a workspace without building.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::{load_global_config, resolve_underlays};
use crate::cli::output::{self, create_spinner, print_json, status, OutputConfig};
use crate::core::check::check_workspace;
use crate::infra::crawler::{crawl_workspaces, merge_underlays, CrawlOptions};

/// Execute the check command
pub async fn execute(root: PathBuf, underlay: &[PathBuf]) -> Result<()> {
    let config = load_global_config()?;
    let underlays = resolve_underlays(underlay, &config)?;

    tracing::info!("Checking workspace: {}", root.display());
    let mut workspaces = vec![root.clone()];
    workspaces.extend(underlays.iter().cloned());

    let spinner = create_spinner("Crawling workspaces...");
    let crawled = crawl_workspaces(&workspaces, &CrawlOptions::default()).await;
    spinner.finish_and_clear();
    let mut crawled =
        crawled.with_context(|| format!("Failed to crawl {}", root.display()))?;
    let projects = crawled.remove(0);
    let underlay = merge_underlays(&underlays, crawled);

    let result = check_workspace(&projects, &underlay)?;

    if OutputConfig::current().json {
        print_json(&result)?;
    } else {
        println!("Checking {} projects...\n", projects.len());

        match &result.cycle {
            None => println!("{} No dependency cycles", status::SUCCESS),
            Some(members) => println!("{} Circular dependency among: {members}", status::ERROR),
        }

        match (&result.version, &result.version_mismatch) {
            (Some(version), _) => println!("{} All projects share version {version}", status::SUCCESS),
            (None, Some(mismatch)) => println!("{} {mismatch}", status::WARNING),
            (None, None) => {}
        }

        if result.metaproject_violations.is_empty() {
            println!("{} Metaprojects follow the rules", status::SUCCESS);
        } else {
            for violation in &result.metaproject_violations {
                println!("{} {violation}", status::ERROR);
            }
        }

        for warning in &result.warnings {
            output::warning(warning);
        }

        println!("\nBuild order:");
        if result.build_order.is_empty() {
            println!("  (none)");
        }
        for name in &result.build_order {
            println!("  • {name}");
        }
    }

    if !result.is_valid() {
        bail!("Workspace check failed");
    }
    Ok(())
}
