//! Project descriptors
//!
//! A [`ProjectDescriptor`] is the validated, immutable view of one project
//! manifest that the ordering engine works on. Descriptors are produced by
//! [`crate::core::manifest`] or assembled directly with [`ProjectBuilder`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::defaults::CORE_BUILD_TOOL;
use crate::core::dependency::Dependency;

/// Projects keyed by their location relative to the workspace root
pub type ProjectMap = BTreeMap<PathBuf, ProjectDescriptor>;

/// Kind of a dependency list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Build,
    BuildTool,
    Run,
    Test,
}

impl DependencyKind {
    /// Every kind, in manifest order
    pub const ALL: [DependencyKind; 4] = [Self::Build, Self::BuildTool, Self::Run, Self::Test];

    /// Short label used in messages (`build`, `buildtool`, ...)
    pub fn label(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::BuildTool => "buildtool",
            Self::Run => "run",
            Self::Test => "test",
        }
    }
}

/// Immutable description of a single project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    name: String,
    version: String,
    description: String,
    path: PathBuf,
    builddeps: Vec<Dependency>,
    buildtooldeps: Vec<Dependency>,
    rundeps: Vec<Dependency>,
    testdeps: Vec<Dependency>,
    is_metaproject: bool,
    message_generator: Option<String>,
    maintainers: Vec<String>,
    deprecated: Option<String>,
}

impl ProjectDescriptor {
    /// Start building a descriptor for the project `name`
    pub fn builder(name: impl Into<String>) -> ProjectBuilder {
        ProjectBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Location of the project, relative to its workspace root
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn builddeps(&self) -> &[Dependency] {
        &self.builddeps
    }

    pub fn buildtooldeps(&self) -> &[Dependency] {
        &self.buildtooldeps
    }

    pub fn rundeps(&self) -> &[Dependency] {
        &self.rundeps
    }

    pub fn testdeps(&self) -> &[Dependency] {
        &self.testdeps
    }

    /// Dependencies of the given kind
    pub fn dependencies(&self, kind: DependencyKind) -> &[Dependency] {
        match kind {
            DependencyKind::Build => &self.builddeps,
            DependencyKind::BuildTool => &self.buildtooldeps,
            DependencyKind::Run => &self.rundeps,
            DependencyKind::Test => &self.testdeps,
        }
    }

    pub fn is_metaproject(&self) -> bool {
        self.is_metaproject
    }

    /// Generator payload when this project generates code for others
    pub fn message_generator(&self) -> Option<&str> {
        self.message_generator.as_deref()
    }

    pub fn maintainers(&self) -> &[String] {
        &self.maintainers
    }

    /// Deprecation note; an empty string means deprecated without a note
    pub fn deprecated(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    /// Whether the project build-tool depends on the core build tool
    pub fn has_buildtooldep_on_core_tool(&self) -> bool {
        self.buildtooldeps.iter().any(|d| d.name == CORE_BUILD_TOOL)
    }

    /// Whether the project declares anything a metaproject may not
    ///
    /// Metaprojects may only declare run dependencies plus a build-tool
    /// dependency on the core build tool.
    pub fn has_invalid_metaproject_dependencies(&self) -> bool {
        let extra_tools = self
            .buildtooldeps
            .iter()
            .filter(|d| d.name != CORE_BUILD_TOOL)
            .count();
        !self.builddeps.is_empty() || extra_tools > 0 || !self.testdeps.is_empty()
    }
}

/// Builder for [`ProjectDescriptor`]
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    inner: ProjectDescriptor,
}

impl ProjectBuilder {
    fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            inner: ProjectDescriptor {
                path: PathBuf::from(&name),
                name,
                version: "0.0.0".to_string(),
                description: String::new(),
                builddeps: Vec::new(),
                buildtooldeps: Vec::new(),
                rundeps: Vec::new(),
                testdeps: Vec::new(),
                is_metaproject: false,
                message_generator: None,
                maintainers: Vec::new(),
                deprecated: None,
            },
        }
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.inner.version = version.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    /// Location of the project; defaults to its name
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.path = path.into();
        self
    }

    /// Append a dependency of the given kind
    #[must_use]
    pub fn depends(mut self, kind: DependencyKind, dep: impl Into<Dependency>) -> Self {
        let list = match kind {
            DependencyKind::Build => &mut self.inner.builddeps,
            DependencyKind::BuildTool => &mut self.inner.buildtooldeps,
            DependencyKind::Run => &mut self.inner.rundeps,
            DependencyKind::Test => &mut self.inner.testdeps,
        };
        list.push(dep.into());
        self
    }

    #[must_use]
    pub fn build_dep(self, dep: impl Into<Dependency>) -> Self {
        self.depends(DependencyKind::Build, dep)
    }

    #[must_use]
    pub fn buildtool_dep(self, dep: impl Into<Dependency>) -> Self {
        self.depends(DependencyKind::BuildTool, dep)
    }

    #[must_use]
    pub fn run_dep(self, dep: impl Into<Dependency>) -> Self {
        self.depends(DependencyKind::Run, dep)
    }

    #[must_use]
    pub fn test_dep(self, dep: impl Into<Dependency>) -> Self {
        self.depends(DependencyKind::Test, dep)
    }

    #[must_use]
    pub fn metaproject(mut self, is_metaproject: bool) -> Self {
        self.inner.is_metaproject = is_metaproject;
        self
    }

    #[must_use]
    pub fn message_generator(mut self, generator: impl Into<String>) -> Self {
        self.inner.message_generator = Some(generator.into());
        self
    }

    #[must_use]
    pub fn maintainer(mut self, maintainer: impl Into<String>) -> Self {
        self.inner.maintainers.push(maintainer.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, note: impl Into<String>) -> Self {
        self.inner.deprecated = Some(note.into());
        self
    }

    pub fn build(self) -> ProjectDescriptor {
        self.inner
    }
}
