//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test workspace context
///
/// Creates a temporary directory for a test workspace and provides
/// utilities for setting up projects in it.
pub struct TestProject {
    /// Temporary directory for the test workspace
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test workspace in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test workspace directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test workspace
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Add a project manifest in directory `dir`
    pub fn add_project(&self, dir: &str, manifest: &ManifestBuilder) {
        self.create_file(&format!("{dir}/project.toml"), &manifest.render());
    }

    /// Check if a file exists in the test workspace
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test workspace
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `project.toml` contents
#[derive(Clone)]
pub struct ManifestBuilder {
    name: String,
    version: String,
    build: Vec<String>,
    buildtool: Vec<String>,
    run: Vec<String>,
    metaproject: bool,
    message_generator: Option<String>,
}

impl ManifestBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            build: Vec::new(),
            buildtool: Vec::new(),
            run: Vec::new(),
            metaproject: false,
            message_generator: None,
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn build_dep(mut self, name: &str) -> Self {
        self.build.push(name.to_string());
        self
    }

    pub fn buildtool_dep(mut self, name: &str) -> Self {
        self.buildtool.push(name.to_string());
        self
    }

    pub fn run_dep(mut self, name: &str) -> Self {
        self.run.push(name.to_string());
        self
    }

    pub fn metaproject(mut self) -> Self {
        self.metaproject = true;
        self
    }

    pub fn message_generator(mut self, generator: &str) -> Self {
        self.message_generator = Some(generator.to_string());
        self
    }

    pub fn render(&self) -> String {
        let list = |deps: &[String]| {
            deps.iter()
                .map(|d| format!("\"{d}\""))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut out = format!(
            "[project]\nname = \"{}\"\nversion = \"{}\" # keep in sync\ndescription = \"The {} project\"\nlicenses = [\"BSD\"]\nmaintainers = [{{ name = \"Jane\", email = \"jane@example.com\" }}]\n\n[dependencies]\nbuild = [{}]\nbuildtool = [{}]\nrun = [{}]\n",
            self.name,
            self.version,
            self.name,
            list(&self.build),
            list(&self.buildtool),
            list(&self.run)
        );
        if self.metaproject || self.message_generator.is_some() {
            out.push_str("\n[export]\n");
            if self.metaproject {
                out.push_str("metaproject = true\n");
            }
            if let Some(generator) = &self.message_generator {
                out.push_str(&format!("message_generator = \"{generator}\"\n"));
            }
        }
        out
    }
}

/// Run the orderly binary in `dir` with an isolated environment
pub fn run_orderly_in(dir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_orderly"));
    cmd.current_dir(dir);
    cmd.env("ORDERLY_CONFIG_DIR", dir.join(".orderly-config"));
    cmd.env_remove("ORDERLY_PREFIX_PATH");
    cmd.env_remove("RUST_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute orderly")
}

/// Run the orderly binary inside the test workspace
pub fn run_orderly(project: &TestProject, args: &[&str]) -> Output {
    run_orderly_in(&project.path(), args)
}

/// Stdout of a command as lines
pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
