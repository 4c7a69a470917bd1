//! Default configuration values

/// File name of a project manifest
pub const MANIFEST_FILENAME: &str = "project.toml";

/// Directories containing this file are not crawled
pub const IGNORE_MARKER: &str = "ORDERLY_IGNORE";

/// Marker file identifying a workspace root; lists its source spaces
pub const WORKSPACE_MARKER: &str = ".orderly";

/// Separator between source spaces in the workspace marker
pub const SOURCE_SPACE_SEPARATOR: char = ';';

/// Name of the core build tool; metaprojects build-tool depend on it
pub const CORE_BUILD_TOOL: &str = "orderly";

/// Environment variable listing prefix paths of underlay workspaces
pub const ENV_PREFIX_PATH: &str = "ORDERLY_PREFIX_PATH";

/// Environment variable overriding the configuration directory
pub const ENV_CONFIG_DIR: &str = "ORDERLY_CONFIG_DIR";

/// Newest manifest format accepted without warning
pub const MANIFEST_FORMAT: i64 = 1;

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
