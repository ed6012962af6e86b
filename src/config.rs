//! Configuration file support for source-gates
//!
//! All checks read an optional `.source-gates.toml` that sets project-wide
//! defaults. Command-line flags override the file, the file overrides the
//! built-in defaults.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .source-gates.toml
//!
//! [scan]
//! # Paths (relative to the scanned directory) left out of the scan entirely
//! exclude = ["third_party/*", "generated/*"]
//!
//! [coupling]
//! threshold = 13.37
//! ignore_main = true
//!
//! [coverage]
//! threshold = 90.0
//!
//! [output]
//! format = "fancy_grid"
//! only_show_failures = false
//! ```

use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gate::{DEFAULT_COUPLING_THRESHOLD, DEFAULT_COVERAGE_THRESHOLD};
use crate::scanner::ScanOptions;
use crate::table::OutputFormat;

/// File names searched for, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".source-gates.toml", "source-gates.toml"];

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid glob pattern: {0}")]
    PatternError(String),
}

/// Scan configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Glob patterns for files to leave out of the scan
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Coupling configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CouplingSection {
    #[serde(default = "default_coupling_threshold")]
    pub threshold: f64,

    #[serde(default = "default_ignore_main")]
    pub ignore_main: bool,
}

fn default_coupling_threshold() -> f64 {
    DEFAULT_COUPLING_THRESHOLD
}

fn default_ignore_main() -> bool {
    true
}

impl Default for CouplingSection {
    fn default() -> Self {
        Self {
            threshold: default_coupling_threshold(),
            ignore_main: default_ignore_main(),
        }
    }
}

/// Coverage configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageSection {
    #[serde(default = "default_coverage_threshold")]
    pub threshold: f64,
}

fn default_coverage_threshold() -> f64 {
    DEFAULT_COVERAGE_THRESHOLD
}

impl Default for CoverageSection {
    fn default() -> Self {
        Self {
            threshold: default_coverage_threshold(),
        }
    }
}

/// Output configuration section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub only_show_failures: bool,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GatesConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub coupling: CouplingSection,

    #[serde(default)]
    pub coverage: CoverageSection,

    #[serde(default)]
    pub output: OutputSection,
}

impl GatesConfig {
    /// Compile the scan section into ready-to-use options
    pub fn scan_options(&self) -> Result<ScanOptions, ConfigError> {
        let exclude = self
            .scan
            .exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::PatternError(format!("{}: {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScanOptions { exclude })
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<GatesConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load configuration for `start_path`.
///
/// A file path is read directly. A directory is searched, together with its
/// ancestors, for one of [`CONFIG_FILE_NAMES`]. No file means defaults.
pub fn load_config(start_path: &Path) -> Result<(GatesConfig, Option<PathBuf>), ConfigError> {
    let config_path = if start_path.is_file() {
        Some(start_path.to_path_buf())
    } else {
        find_config_file(start_path)
    };

    match config_path {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config = parse_config(&content)?;
            Ok((config, Some(path)))
        }
        None => Ok((GatesConfig::default(), None)),
    }
}

/// Find the config file by searching up the directory tree
fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let start = start_path
        .canonicalize()
        .unwrap_or_else(|_| start_path.to_path_buf());

    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}
