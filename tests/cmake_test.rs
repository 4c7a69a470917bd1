//! Integration tests for the CMake exports
//!
//! Covers `orderly cmake` for workspace build orders and
//! `orderly project-vars` for single projects.

mod common;

use common::{run_orderly, ManifestBuilder, TestProject};

fn workspace() -> TestProject {
    let project = TestProject::new();
    project.add_project("core", &ManifestBuilder::new("core"));
    project.add_project(
        "gen",
        &ManifestBuilder::new("gen").message_generator("genlang").build_dep("core"),
    );
    project.add_project("app", &ManifestBuilder::new("app").build_dep("gen"));
    project
}

#[test]
fn test_cmake_to_stdout() {
    let project = workspace();

    let output = run_orderly(&project, &["cmake"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("set(ORDERLY_ORDERED_PROJECTS \"\")"));
    let appends: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("list(APPEND ORDERLY_ORDERED_PROJECTS "))
        .collect();
    assert_eq!(
        appends,
        vec![
            "list(APPEND ORDERLY_ORDERED_PROJECTS \"core\")",
            "list(APPEND ORDERLY_ORDERED_PROJECTS \"gen\")",
            "list(APPEND ORDERLY_ORDERED_PROJECTS \"app\")",
        ]
    );
    assert!(stdout.contains("list(APPEND ORDERLY_MESSAGE_GENERATORS \"gen\")"));
}

#[test]
fn test_cmake_to_file() {
    let project = workspace();

    let output = run_orderly(&project, &["cmake", "--output", "build/order.cmake"]);

    assert!(output.status.success());
    assert!(project.file_exists("build/order.cmake"));
    let content = project.read_file("build/order.cmake");
    assert!(content.contains("list(APPEND ORDERLY_ORDERED_PROJECT_PATHS \"gen\")"));
    assert!(content.contains("list(APPEND ORDERLY_ORDERED_PROJECTS_IS_META \"FALSE\")"));
}

#[test]
fn test_cmake_cycle_becomes_fatal_error() {
    let project = TestProject::new();
    project.add_project("a", &ManifestBuilder::new("a").build_dep("b"));
    project.add_project("b", &ManifestBuilder::new("b").build_dep("a"));

    let output = run_orderly(&project, &["cmake"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("message(FATAL_ERROR \"Circular dependency"));
}

#[test]
fn test_project_vars() {
    let project = TestProject::new();
    project.add_project(
        "gen",
        &ManifestBuilder::new("gen").build_dep("core").run_dep("runtime"),
    );

    let output = run_orderly(&project, &["project-vars", "gen"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "set(_ORDERLY_CURRENT_PROJECT \"gen\")");
    assert!(lines.contains(&"set(gen_VERSION \"1.0.0\")"));
    assert!(lines.contains(&"set(gen_BUILDDEPS \"core\")"));
    assert!(lines.contains(&"set(gen_RUNDEPS \"runtime\")"));
    assert!(lines.contains(&"set(gen_MAINTAINER \"Jane <jane@example.com>\")"));
}

#[test]
fn test_project_vars_missing_manifest() {
    let project = TestProject::new();

    let output = run_orderly(&project, &["project-vars", "nowhere"]);

    assert!(!output.status.success());
}
