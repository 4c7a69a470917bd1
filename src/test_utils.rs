//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::project::ProjectDescriptor;

    /// Generate a project name following the strict naming conventions
    pub fn project_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,20}"
    }

    /// Generate a valid semver version string
    pub fn semver_version() -> impl Strategy<Value = String> {
        (0u32..100, 0u32..100, 0u32..100)
            .prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}"))
    }

    /// Generate an acyclic workspace of up to 12 projects
    ///
    /// Projects only depend on projects generated before them, and names are
    /// shuffled so alphabetical order does not follow dependency order. Some
    /// dependencies point outside the workspace and some projects are
    /// message generators.
    pub fn acyclic_workspace() -> impl Strategy<Value = Vec<ProjectDescriptor>> {
        (1usize..12)
            .prop_flat_map(|n| {
                let names = Just((0..n).map(|i| format!("p{i:02}")).collect::<Vec<_>>())
                    .prop_shuffle();
                let edges = proptest::collection::vec(
                    (
                        proptest::collection::vec(prop::bool::weighted(0.3), n),
                        proptest::collection::vec(prop::bool::weighted(0.3), n),
                        prop::bool::weighted(0.2),
                        any::<bool>(),
                    ),
                    n,
                );
                (names, edges)
            })
            .prop_map(|(names, edges)| {
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        let (build, run, generator, external) = &edges[i];
                        let mut builder = ProjectDescriptor::builder(name.clone());
                        for (j, dep) in names.iter().enumerate().take(i) {
                            if build[j] {
                                builder = builder.build_dep(dep.as_str());
                            }
                            if run[j] {
                                builder = builder.run_dep(dep.as_str());
                            }
                        }
                        if *external {
                            builder = builder.build_dep("external_dep");
                        }
                        if *generator {
                            builder = builder.message_generator("gen");
                        }
                        builder.build()
                    })
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_project_name_generator(name in project_name()) {
            prop_assert!(crate::core::manifest::is_valid_project_name(&name));
        }

        #[test]
        fn test_semver_version_generator(version in semver_version()) {
            prop_assert!(semver::Version::parse(&version).is_ok());
            prop_assert!(crate::core::manifest::is_valid_project_version(&version));
        }

        #[test]
        fn test_acyclic_workspace_generator(projects in acyclic_workspace()) {
            let names: BTreeSet<&str> = projects.iter().map(|p| p.name()).collect();
            prop_assert_eq!(names.len(), projects.len());
            for (i, project) in projects.iter().enumerate() {
                for dep in project.builddeps().iter().chain(project.rundeps()) {
                    if dep.name == "external_dep" {
                        continue;
                    }
                    let position = projects.iter().position(|p| p.name() == dep.name);
                    prop_assert!(position.is_some_and(|j| j < i));
                }
            }
        }
    }
}
