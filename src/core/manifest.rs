//! Manifest (project.toml) parsing and validation
//!
//! Every project of a workspace carries a `project.toml` at its root.
//! Parsing is strict: unknown keys are rejected. Validation collects every
//! problem instead of stopping at the first one.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::defaults::{CORE_BUILD_TOOL, MANIFEST_FILENAME, MANIFEST_FORMAT};
use crate::core::dependency::{Dependency, DependencySpec};
use crate::core::project::{DependencyKind, ProjectDescriptor};
use crate::error::ManifestError;

/// The project manifest (project.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Manifest format; positive when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<i64>,

    /// Project metadata
    pub project: ProjectSection,

    /// Dependency lists
    #[serde(default)]
    pub dependencies: DependenciesSection,

    /// Flags exported to other tools
    #[serde(default)]
    pub export: ExportSection,
}

/// The `[project]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub licenses: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<ProjectUrl>,

    #[serde(default)]
    pub maintainers: Vec<Person>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Person>>,
}

/// A maintainer or author
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Person {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{email}>", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A project url such as the website or the bug tracker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProjectUrl {
    pub url: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The `[dependencies]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DependenciesSection {
    #[serde(default)]
    pub build: Vec<DependencySpec>,

    #[serde(default)]
    pub buildtool: Vec<DependencySpec>,

    #[serde(default)]
    pub run: Vec<DependencySpec>,

    #[serde(default)]
    pub test: Vec<DependencySpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<DependencySpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<DependencySpec>,
}

impl DependenciesSection {
    fn list(&self, kind: DependencyKind) -> &[DependencySpec] {
        match kind {
            DependencyKind::Build => &self.build,
            DependencyKind::BuildTool => &self.buildtool,
            DependencyKind::Run => &self.run,
            DependencyKind::Test => &self.test,
        }
    }
}

/// The `[export]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    #[serde(default)]
    pub metaproject: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_generator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
}

/// Deprecation marker: `true` or a note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Deprecation {
    Flag(bool),
    Note(String),
}

impl Deprecation {
    /// The note, empty when deprecated without one; `None` when not deprecated
    pub fn note(&self) -> Option<&str> {
        match self {
            Self::Flag(true) => Some(""),
            Self::Flag(false) => None,
            Self::Note(note) => Some(note),
        }
    }
}

/// Problems found in a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Rule violations; any of them makes the manifest invalid
    pub errors: Vec<String>,
    /// Convention violations
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap_or_else(|e| panic!("invalid pattern {pattern}: {e}")))
}

fn name_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"^[a-zA-Z0-9][a-zA-Z0-9_-]*$")
}

fn strict_name_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"^[a-z][a-z0-9_]*$")
}

fn version_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"^[0-9]+\.[0-9_]+\.[0-9_]+$")
}

fn email_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9._%-]+\.[a-zA-Z]{2,6}$")
}

/// Whether `name` is acceptable as a project name
pub fn is_valid_project_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// Whether `version` is acceptable as a project version
pub fn is_valid_project_version(version: &str) -> bool {
    version_pattern().is_match(version)
}

/// Resolve a manifest location: a project directory or the file itself
pub fn manifest_path(path: &Path) -> Result<PathBuf, ManifestError> {
    if path.is_dir() {
        let file = path.join(MANIFEST_FILENAME);
        if file.is_file() {
            return Ok(file);
        }
    } else if path.is_file() {
        return Ok(path.to_path_buf());
    }
    Err(ManifestError::NotFound {
        path: path.to_path_buf(),
    })
}

impl Manifest {
    /// Load the manifest of a project directory or a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let file = manifest_path(path)?;
        let content = std::fs::read_to_string(&file).map_err(|e| ManifestError::Read {
            path: file.clone(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|source| ManifestError::Parse { path: file, source })
    }

    /// Load manifest from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn dependencies(&self, kind: DependencyKind) -> Vec<Dependency> {
        self.dependencies
            .list(kind)
            .iter()
            .cloned()
            .map(Dependency::from)
            .collect()
    }

    /// Check the manifest against the project rules
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let errors = &mut report.errors;
        let project = &self.project;

        if let Some(format) = self.format {
            if format < 1 {
                errors.push(
                    "The \"format\" attribute of the project must contain a positive integer if present"
                        .to_string(),
                );
            } else if format > MANIFEST_FORMAT {
                report.warnings.push(format!(
                    "Manifest format {format} is newer than the supported format {MANIFEST_FORMAT}"
                ));
            }
        }

        if project.name.is_empty() {
            errors.push("Project name must not be empty".to_string());
        } else if !is_valid_project_name(&project.name) {
            errors.push(format!(
                "Project name \"{}\" does not follow naming conventions",
                project.name
            ));
        } else if !strict_name_pattern().is_match(&project.name) {
            report.warnings.push(format!(
                "Project name \"{}\" does not follow the naming conventions. It should start with a lower case letter and only contain lower case letters, digits and underscores.",
                project.name
            ));
        }

        if project.version.is_empty() {
            errors.push("Project version must not be empty".to_string());
        } else if !is_valid_project_version(&project.version) {
            errors.push(format!(
                "Project version \"{}\" does not follow version conventions",
                project.version
            ));
        }

        if project.description.trim().is_empty() {
            errors.push("Project description must not be empty".to_string());
        }

        if project.maintainers.is_empty() {
            errors.push("Project must declare at least one maintainer".to_string());
        }
        for maintainer in &project.maintainers {
            match &maintainer.email {
                Some(email) => check_email(maintainer, email, errors),
                None => errors.push("Maintainers must have an email address".to_string()),
            }
        }
        for author in project.authors.iter().flatten() {
            if let Some(email) = &author.email {
                check_email(author, email, errors);
            }
        }

        if project.licenses.is_empty() {
            errors.push("The project must declare at least one license".to_string());
        }

        for kind in DependencyKind::ALL {
            for dep in self.dependencies(kind) {
                if dep.name == project.name {
                    errors.push(format!(
                        "The project must not {}_depend on a project with the same name as this project",
                        kind.label()
                    ));
                }
            }
        }

        let build_or_run: Vec<Dependency> = self
            .dependencies(DependencyKind::Build)
            .into_iter()
            .chain(self.dependencies(DependencyKind::Run))
            .collect();
        for dep in self.dependencies(DependencyKind::Test) {
            if build_or_run.iter().any(|d| d.name == dep.name) {
                errors.push(format!(
                    "The test dependency on \"{}\" is redundant with a build or run dependency",
                    dep.name
                ));
            }
        }

        if self.export.metaproject {
            let descriptor = self.clone().into_descriptor(PathBuf::new());
            if !descriptor.has_buildtooldep_on_core_tool() {
                report.warnings.push(format!(
                    "Metaproject \"{}\" must buildtool_depend on {CORE_BUILD_TOOL}.",
                    project.name
                ));
            }
            if descriptor.has_invalid_metaproject_dependencies() {
                report.warnings.push(format!(
                    "Metaproject \"{}\" should not have other dependencies besides a buildtool_depend on {CORE_BUILD_TOOL} and run dependencies.",
                    project.name
                ));
            }
        }

        report
    }

    /// Convert into a descriptor located at `path`
    pub fn into_descriptor(self, path: impl Into<PathBuf>) -> ProjectDescriptor {
        let mut builder = ProjectDescriptor::builder(self.project.name.clone())
            .version(self.project.version.clone())
            .description(self.project.description.clone())
            .path(path)
            .metaproject(self.export.metaproject);
        for kind in DependencyKind::ALL {
            for dep in self.dependencies(kind) {
                builder = builder.depends(kind, dep);
            }
        }
        for maintainer in &self.project.maintainers {
            builder = builder.maintainer(maintainer.to_string());
        }
        if let Some(generator) = self.export.message_generator {
            builder = builder.message_generator(generator);
        }
        if let Some(note) = self.export.deprecated.as_ref().and_then(Deprecation::note) {
            builder = builder.deprecated(note);
        }
        builder.build()
    }
}

fn check_email(person: &Person, email: &str, errors: &mut Vec<String>) {
    if !email_pattern().is_match(email) {
        errors.push(format!(
            "Invalid email \"{email}\" for person \"{}\"",
            person.name
        ));
    }
}

/// Load, validate and convert the manifest found at `location`
///
/// The descriptor records `relative_path` as its location. Warnings are
/// logged; errors fail with every problem listed.
pub fn parse_project(
    location: &Path,
    relative_path: impl Into<PathBuf>,
) -> Result<ProjectDescriptor, ManifestError> {
    let file = manifest_path(location)?;
    let manifest = Manifest::load(&file)?;
    let report = manifest.validate();
    for warning in &report.warnings {
        tracing::warn!("{}: {warning}", file.display());
    }
    if !report.is_valid() {
        return Err(ManifestError::Invalid {
            path: file,
            errors: report.errors,
        });
    }
    tracing::debug!("parsed project {} from {}", manifest.project.name, file.display());
    Ok(manifest.into_descriptor(relative_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"
format = 1

[project]
name = "foo"
version = "1.2.3"
description = "The foo project"
licenses = ["BSD"]
maintainers = [{ name = "Jane", email = "jane@example.com" }]

[dependencies]
build = ["bar", { name = "baz", gte = "1.0.0" }]
buildtool = ["cmake"]
run = ["qux"]

[export]
message_generator = "foolang"
"#;

    fn manifest(content: &str) -> Manifest {
        Manifest::from_toml(content).unwrap()
    }

    #[test]
    fn test_parse_valid_manifest() {
        let m = manifest(VALID);

        assert_eq!(m.project.name, "foo");
        assert_eq!(m.dependencies.build.len(), 2);
        assert!(m.validate().is_valid());
        assert!(m.validate().warnings.is_empty());
    }

    #[test]
    fn test_into_descriptor() {
        let project = manifest(VALID).into_descriptor("src/foo");

        assert_eq!(project.name(), "foo");
        assert_eq!(project.version(), "1.2.3");
        assert_eq!(project.path(), Path::new("src/foo"));
        assert_eq!(project.builddeps()[1].gte.as_deref(), Some("1.0.0"));
        assert_eq!(project.message_generator(), Some("foolang"));
        assert_eq!(project.maintainers(), ["Jane <jane@example.com>"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let content = VALID.replace("format = 1", "format = 1\nbogus = true");
        assert!(Manifest::from_toml(&content).is_err());

        let content = VALID.replace(
            "message_generator = \"foolang\"",
            "message_generatr = \"foolang\"",
        );
        assert!(Manifest::from_toml(&content).is_err());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let m = manifest(
            r#"
format = 0

[project]
name = "1-bad!"
version = "1.2"

[dependencies]
build = ["x"]
test = ["x"]
"#,
        );
        let report = m.validate();

        assert!(!report.is_valid());
        let all = report.errors.join("\n");
        assert!(all.contains("positive integer"));
        assert!(all.contains("naming conventions"));
        assert!(all.contains("version conventions"));
        assert!(all.contains("description must not be empty"));
        assert!(all.contains("at least one maintainer"));
        assert!(all.contains("at least one license"));
        assert!(all.contains("redundant"));
    }

    #[test]
    fn test_loose_version_constraints_are_accepted() {
        let content = VALID
            .replace("version = \"1.2.3\"", "version = \"1.2_3.4\"")
            .replace(
                "build = [\"bar\", { name = \"baz\", gte = \"1.0.0\" }]",
                "build = [{ name = \"bar\", gte = \"1.2\" }, { name = \"baz\", eq = \"1.2_3.4\" }]",
            );
        let m = manifest(&content);
        let report = m.validate();

        assert!(report.is_valid(), "errors: {:?}", report.errors);
        let project = m.into_descriptor("foo");
        assert_eq!(project.builddeps()[0].gte.as_deref(), Some("1.2"));
        assert_eq!(project.builddeps()[1].eq.as_deref(), Some("1.2_3.4"));
    }

    #[test]
    fn test_validate_self_dependency() {
        let content = VALID.replace("run = [\"qux\"]", "run = [\"foo\"]");
        let errors = manifest(&content).validate().errors;

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("run_depend"));
    }

    #[test]
    fn test_newer_format_is_warning() {
        let report = manifest(&VALID.replace("format = 1", "format = 2")).validate();

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("format 2"));
    }

    #[test]
    fn test_validate_emails() {
        let content = VALID.replace(
            "maintainers = [{ name = \"Jane\", email = \"jane@example.com\" }]",
            "maintainers = [{ name = \"Jane\" }, { name = \"Joe\", email = \"nope\" }]\nauthors = [{ name = \"Ann\", email = \"bad@\" }]",
        );
        let errors = manifest(&content).validate().errors;

        assert!(errors.iter().any(|e| e == "Maintainers must have an email address"));
        assert!(errors.iter().any(|e| e.contains("\"nope\"")));
        assert!(errors.iter().any(|e| e.contains("\"Ann\"")));
    }

    #[test]
    fn test_uppercase_name_is_warning() {
        let content = VALID.replace("name = \"foo\"", "name = \"Foo-Bar\"");
        let report = manifest(&content).validate();

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_metaproject_warnings() {
        let content = VALID.replace(
            "message_generator = \"foolang\"",
            "metaproject = true",
        );
        let report = manifest(&content).validate();

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("must buildtool_depend on orderly"));
    }

    #[test]
    fn test_deprecation_forms() {
        let flagged = VALID.replace(
            "message_generator = \"foolang\"",
            "deprecated = true",
        );
        assert_eq!(manifest(&flagged).into_descriptor("foo").deprecated(), Some(""));

        let noted = VALID.replace(
            "message_generator = \"foolang\"",
            "deprecated = \"use bar\"",
        );
        assert_eq!(
            manifest(&noted).into_descriptor("foo").deprecated(),
            Some("use bar")
        );
    }

    #[test]
    fn test_parse_project_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), VALID).unwrap();

        let project = parse_project(dir.path(), "foo").unwrap();
        assert_eq!(project.name(), "foo");
    }

    #[test]
    fn test_parse_project_reports_invalid() {
        let dir = TempDir::new().unwrap();
        let content = VALID.replace("licenses = [\"BSD\"]", "licenses = []");
        fs::write(dir.path().join(MANIFEST_FILENAME), content).unwrap();

        let err = parse_project(dir.path(), "foo").unwrap_err();
        assert!(matches!(err, ManifestError::Invalid { ref errors, .. } if errors.len() == 1));
    }

    #[test]
    fn test_manifest_path_missing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            manifest_path(dir.path()),
            Err(ManifestError::NotFound { .. })
        ));
    }
}
