//! Version management for orderly projects
//!
//! This module handles:
//! - Bumping `x.y.z` project versions
//! - Rewriting the version line of project manifests in place

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::defaults::MANIFEST_FILENAME;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Errors related to project versions
#[derive(Error, Debug)]
pub enum VersionError {
    /// Version is not of the form `int.int.int`
    #[error("Invalid version string, must be int.int.int: \"{version}\"")]
    InvalidVersion { version: String },

    /// Unknown version part
    #[error("Invalid version part '{part}': must be one of major, minor, patch")]
    InvalidPart { part: String },

    /// The manifest does not contain exactly one project version line
    #[error("Failed to rewrite version in '{path}': expected exactly one version in [project], found {found}")]
    VersionLine { path: PathBuf, found: usize },

    /// Reading or writing a manifest failed
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Part of a version to increment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BumpPart {
    Major,
    Minor,
    #[default]
    Patch,
}

impl BumpPart {
    fn index(self) -> usize {
        match self {
            Self::Major => 0,
            Self::Minor => 1,
            Self::Patch => 2,
        }
    }
}

impl FromStr for BumpPart {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            other => Err(VersionError::InvalidPart {
                part: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for BumpPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        })
    }
}

/// Increment one part of `version` and reset the parts after it
///
/// # Examples
/// ```
/// use orderly::core::version::{bump_version, BumpPart};
///
/// assert_eq!(bump_version("1.2.3", BumpPart::Minor).unwrap(), "1.3.0");
/// ```
pub fn bump_version(version: &str, part: BumpPart) -> Result<String, VersionError> {
    let invalid = || VersionError::InvalidVersion {
        version: version.to_string(),
    };

    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit())) {
        return Err(invalid());
    }
    let mut numbers = parts
        .iter()
        .map(|p| p.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;

    let idx = part.index();
    numbers[idx] = numbers[idx].checked_add(1).ok_or_else(invalid)?;
    for number in numbers.iter_mut().skip(idx + 1) {
        *number = 0;
    }
    Ok(format!("{}.{}.{}", numbers[0], numbers[1], numbers[2]))
}

fn version_line() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r#"^(\s*version\s*=\s*)"[^"]*"(.*)$"#)
            .unwrap_or_else(|e| panic!("invalid version line pattern: {e}"))
    })
}

fn table_header() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"^\s*\[\s*([^\]]+?)\s*\]")
            .unwrap_or_else(|e| panic!("invalid table header pattern: {e}"))
    })
}

/// Replace the version in the `[project]` table of a manifest
///
/// Returns the new content, or the number of version lines found when that
/// is not exactly one.
pub fn rewrite_version(content: &str, new_version: &str) -> Result<String, usize> {
    let mut table = String::new();
    let mut found = 0;
    let mut output = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        let (body, ending) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        if let Some(header) = table_header().captures(body) {
            table = header[1].to_string();
        }
        match version_line().captures(body) {
            Some(caps) if table == "project" => {
                found += 1;
                let rest = &caps[2];
                if rest.trim_start().starts_with('#') {
                    tracing::info!("keeping comment after version: {}", rest.trim());
                }
                output.push_str(&format!("{}\"{new_version}\"{rest}{ending}", &caps[1]));
            }
            _ => output.push_str(line),
        }
    }

    if found == 1 {
        Ok(output)
    } else {
        Err(found)
    }
}

/// Set the version of every project in `project_dirs` to `new_version`
///
/// No manifest is written unless all of them could be rewritten.
pub fn update_versions(project_dirs: &[PathBuf], new_version: &str) -> Result<(), VersionError> {
    let mut rewritten = Vec::with_capacity(project_dirs.len());
    for dir in project_dirs {
        let path = manifest_file(dir);
        let content = filesystem::read_file(&path)?;
        let updated = rewrite_version(&content, new_version)
            .map_err(|found| VersionError::VersionLine {
                path: path.clone(),
                found,
            })?;
        rewritten.push((path, updated));
    }

    for (path, content) in rewritten {
        tracing::debug!("writing version {new_version} to {}", path.display());
        filesystem::write_file(&path, &content)?;
    }
    Ok(())
}

fn manifest_file(dir: &Path) -> PathBuf {
    if dir.is_file() {
        dir.to_path_buf()
    } else {
        dir.join(MANIFEST_FILENAME)
    }
}
