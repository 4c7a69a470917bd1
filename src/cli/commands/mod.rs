//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod bump;
pub mod check;
pub mod cmake;
pub mod list;
pub mod order;
pub mod project_vars;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::defaults::ENV_PREFIX_PATH;
use crate::core::global_config::GlobalConfig;
use crate::core::project::ProjectMap;
use crate::core::version::BumpPart;
use crate::infra::crawler::{self, CrawlOptions};
use crate::infra::dirs::OrderlyDirs;
use crate::infra::workspaces;

/// Workspace selection shared by the ordering commands
#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArgs {
    /// Workspace root (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Only order these projects (repeatable)
    #[arg(long, value_name = "NAME")]
    pub whitelist: Vec<String>,

    /// Never order these projects (repeatable)
    #[arg(long, value_name = "NAME")]
    pub blacklist: Vec<String>,

    /// Underlay workspace providing dependencies (repeatable, first wins)
    #[arg(long, value_name = "DIR")]
    pub underlay: Vec<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the build order of a workspace
    Order {
        #[command(flatten)]
        args: WorkspaceArgs,

        /// Print project paths instead of names
        #[arg(long)]
        paths: bool,
    },

    /// List the projects of a workspace
    List {
        /// Workspace root (defaults to the current directory)
        root: Option<PathBuf>,
    },

    /// Check a workspace for cycles, version drift and rule violations
    Check {
        /// Workspace root (defaults to the current directory)
        root: Option<PathBuf>,

        /// Underlay workspace providing dependencies (repeatable, first wins)
        #[arg(long, value_name = "DIR")]
        underlay: Vec<PathBuf>,
    },

    /// Bump the shared version of all projects in a workspace
    Bump {
        /// Workspace root (defaults to the current directory)
        root: Option<PathBuf>,

        /// Version part to increment (major, minor, patch)
        #[arg(long, default_value = "patch")]
        part: BumpPart,
    },

    /// Write the build order as CMake declarations
    Cmake {
        #[command(flatten)]
        args: WorkspaceArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the variables of one project as CMake declarations
    ProjectVars {
        /// Project directory or manifest file
        manifest_dir: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Order { args, paths } => order::execute(args, paths).await,
            Self::List { root } => list::execute(resolve_root(root)?).await,
            Self::Check { root, underlay } => check::execute(resolve_root(root)?, &underlay).await,
            Self::Bump { root, part } => bump::execute(resolve_root(root)?, part).await,
            Self::Cmake { args, output } => cmake::execute(args, output).await,
            Self::ProjectVars {
                manifest_dir,
                output,
            } => project_vars::execute(&manifest_dir, output.as_deref()),
        }
    }
}

/// The workspace root, defaulting to the current directory
fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => std::env::current_dir().context("Failed to determine the current directory"),
    }
}

fn load_global_config() -> Result<GlobalConfig> {
    GlobalConfig::load(&OrderlyDirs::new()).context("Failed to load global configuration")
}

/// Underlay workspaces from the command line, the global config or the
/// prefix path environment variable, in that order of precedence
fn resolve_underlays(cli: &[PathBuf], config: &GlobalConfig) -> Result<Vec<PathBuf>> {
    let underlays = config.underlays(cli);
    if !underlays.is_empty() || std::env::var_os(ENV_PREFIX_PATH).is_none() {
        return Ok(underlays);
    }
    let spaces = workspaces::get_spaces(None)?;
    tracing::info!("using {} underlay workspaces from {ENV_PREFIX_PATH}", spaces.len());
    Ok(spaces)
}

/// Crawl a single workspace off the async runtime
async fn crawl(root: &Path) -> Result<ProjectMap> {
    let mut crawled = crawler::crawl_workspaces(&[root.to_path_buf()], &CrawlOptions::default())
        .await
        .with_context(|| format!("Failed to crawl {}", root.display()))?;
    Ok(crawled.pop().unwrap_or_default())
}
