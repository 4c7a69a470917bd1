//! Output formatting and progress indicators
//!
//! This module provides the process-wide output settings, progress
//! spinners and helpers for printing messages, tables and JSON.

use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Output settings of the running command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything except results and errors
    pub quiet: bool,
    /// Print machine-readable JSON
    pub json: bool,
    /// Verbosity level from `-v` flags
    pub verbose: u8,
}

static OUTPUT: OnceLock<OutputConfig> = OnceLock::new();

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make this configuration the process-wide one
    ///
    /// Only the first call has an effect.
    pub fn apply_global(self) {
        if OUTPUT.set(self).is_err() {
            tracing::debug!("output configuration already set");
        }
    }

    /// The process-wide configuration, default when never applied
    pub fn current() -> Self {
        OUTPUT.get().copied().unwrap_or_default()
    }

    /// Whether progress and status lines should be printed
    pub fn show_progress(self) -> bool {
        !self.quiet && !self.json
    }
}

/// Create a spinner for operations with unknown duration
///
/// The spinner stays hidden in quiet and JSON mode.
pub fn create_spinner(message: &str) -> ProgressBar {
    if !OutputConfig::current().show_progress() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner().tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(
        style
            .clone()
            .template("{spinner:.blue} {msg}")
            .unwrap_or(style),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Print a success line unless output is quiet or JSON
pub fn success(message: &str) {
    if OutputConfig::current().show_progress() {
        println!("{} {message}", status::SUCCESS);
    }
}

/// Print an informational line unless output is quiet or JSON
pub fn info(message: &str) {
    if OutputConfig::current().show_progress() {
        println!("{} {message}", status::INFO);
    }
}

/// Print a warning line to stderr unless output is quiet
pub fn warning(message: &str) {
    if !OutputConfig::current().quiet {
        eprintln!("{} {message}", status::WARNING);
    }
}

/// Print `value` as pretty JSON to stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    if OutputConfig::current().json {
        let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
        let payload = serde_json::json!({
            "error": error.to_string(),
            "causes": causes,
        });
        eprintln!("{payload}");
        return;
    }

    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_progress() {
        assert!(OutputConfig::new(false, false, 0).show_progress());
        assert!(!OutputConfig::new(true, false, 0).show_progress());
        assert!(!OutputConfig::new(false, true, 2).show_progress());
    }

    #[test]
    fn test_default_config() {
        let config = OutputConfig::default();
        assert!(!config.quiet);
        assert!(!config.json);
        assert_eq!(config.verbose, 0);
    }
}
