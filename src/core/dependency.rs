//! Dependency declarations
//!
//! A dependency names another project and optionally constrains its version.
//! Version constraints never influence the build order; they are carried for
//! reporting and for the workspace check.

use std::fmt;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

/// Version comparison operator of a dependency constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionOp {
    Lt,
    Lte,
    Eq,
    Gte,
    Gt,
}

impl VersionOp {
    /// All operators in declaration order
    pub const ALL: [VersionOp; 5] = [Self::Lt, Self::Lte, Self::Eq, Self::Gte, Self::Gt];

    /// Manifest key of the operator (`lt`, `lte`, ...)
    pub fn key(self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Gt => "gt",
        }
    }

    fn comparator(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Gt => ">",
        }
    }
}

impl fmt::Display for VersionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A dependency on another project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// Name of the project depended on
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<String>,
}

impl Dependency {
    /// Unconstrained dependency on `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a version constraint
    #[must_use]
    pub fn with_constraint(mut self, op: VersionOp, version: impl Into<String>) -> Self {
        let slot = match op {
            VersionOp::Lt => &mut self.lt,
            VersionOp::Lte => &mut self.lte,
            VersionOp::Eq => &mut self.eq,
            VersionOp::Gte => &mut self.gte,
            VersionOp::Gt => &mut self.gt,
        };
        *slot = Some(version.into());
        self
    }

    /// Declared constraints, in operator order
    pub fn constraints(&self) -> impl Iterator<Item = (VersionOp, &str)> {
        VersionOp::ALL.into_iter().filter_map(move |op| {
            let value = match op {
                VersionOp::Lt => &self.lt,
                VersionOp::Lte => &self.lte,
                VersionOp::Eq => &self.eq,
                VersionOp::Gte => &self.gte,
                VersionOp::Gt => &self.gt,
            };
            value.as_deref().map(|v| (op, v))
        })
    }

    /// Whether any version constraint is declared
    pub fn is_constrained(&self) -> bool {
        self.constraints().next().is_some()
    }

    /// The constraints as a semver requirement, `None` when unconstrained
    ///
    /// Fails with the offending version string if one of them is not a
    /// semver version.
    pub fn version_req(&self) -> Result<Option<VersionReq>, String> {
        let mut comparators = Vec::new();
        for (op, version) in self.constraints() {
            Version::parse(version).map_err(|e| format!("{version}: {e}"))?;
            comparators.push(format!("{}{version}", op.comparator()));
        }
        if comparators.is_empty() {
            return Ok(None);
        }
        VersionReq::parse(&comparators.join(", "))
            .map(Some)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Dependency {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A dependency as written in `project.toml`: a bare name or a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Name(String),
    Detailed(Dependency),
}

impl From<DependencySpec> for Dependency {
    fn from(spec: DependencySpec) -> Self {
        match spec {
            DependencySpec::Name(name) => Self::new(name),
            DependencySpec::Detailed(dep) => dep,
        }
    }
}
