//! Integration tests for `orderly bump`

mod common;

use common::{run_orderly, ManifestBuilder, TestProject};

fn two_projects(version: &str, other: &str) -> TestProject {
    let project = TestProject::new();
    project.add_project("core", &ManifestBuilder::new("core").version(version));
    project.add_project("app", &ManifestBuilder::new("app").version(other));
    project
}

#[test]
fn test_bump_patch_by_default() {
    let project = two_projects("1.2.3", "1.2.3");

    let output = run_orderly(&project, &["bump"]);

    assert!(
        output.status.success(),
        "bump failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("from 1.2.3 to 1.2.4"));
    for manifest in ["core/project.toml", "app/project.toml"] {
        let content = project.read_file(manifest);
        assert!(
            content.contains("version = \"1.2.4\" # keep in sync"),
            "{manifest}: {content}"
        );
    }
}

#[test]
fn test_bump_minor_and_major() {
    let project = two_projects("1.2.3", "1.2.3");

    let output = run_orderly(&project, &["bump", "--part", "minor"]);
    assert!(output.status.success());
    assert!(project.read_file("core/project.toml").contains("\"1.3.0\""));

    let output = run_orderly(&project, &["bump", "--part", "major"]);
    assert!(output.status.success());
    assert!(project.read_file("app/project.toml").contains("\"2.0.0\""));
}

#[test]
fn test_bump_refuses_mismatched_versions() {
    let project = two_projects("1.0.0", "1.1.0");

    let output = run_orderly(&project, &["bump"]);

    assert!(!output.status.success());
    assert!(project.read_file("core/project.toml").contains("\"1.0.0\""));
    assert!(project.read_file("app/project.toml").contains("\"1.1.0\""));
}

#[test]
fn test_bump_empty_workspace_fails() {
    let project = TestProject::new();

    let output = run_orderly(&project, &["bump"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No projects found"));
}

#[test]
fn test_bump_invalid_part_is_rejected() {
    let project = two_projects("1.0.0", "1.0.0");

    let output = run_orderly(&project, &["bump", "--part", "build"]);

    assert!(!output.status.success());
    assert!(project.read_file("core/project.toml").contains("\"1.0.0\""));
}

#[test]
fn test_bump_json_output() {
    let project = two_projects("0.9.9", "0.9.9");

    let output = run_orderly(&project, &["--json", "bump", "--part", "minor"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["old_version"], "0.9.9");
    assert_eq!(value["new_version"], "0.10.0");
    assert_eq!(value["projects"], serde_json::json!(["app", "core"]));
}
