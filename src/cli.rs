//! Command-line plumbing shared by the `check-*` binaries
//!
//! Options are parsed into typed structs by `clap` at the process boundary,
//! merged with the config file, and handed to the report builders by value.

use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args};
use tracing::{info, warn};

use crate::config::{ConfigError, GatesConfig, load_config};
use crate::coverage::INDEX_FILE;
use crate::output::{JsonSink, ReportSink, TextSink};
use crate::table::OutputFormat;

/// Options every check accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Table layout [default: fancy_grid]
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Config file path (default: search for .source-gates.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print one JSON document instead of tables
    #[arg(long)]
    pub json: bool,

    /// Verbose diagnostics on stderr (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Load the config file for `target`, honouring `--config`
    pub fn load_config(&self, target: &Path) -> Result<GatesConfig, ConfigError> {
        let search_from = self.config.as_deref().unwrap_or(target);
        let (config, path) = load_config(search_from)?;
        if let Some(path) = path {
            info!(path = %path.display(), "loaded configuration");
        }
        Ok(config)
    }

    /// CLI flag, then config file
    pub fn output_format(&self, config: &GatesConfig) -> OutputFormat {
        self.output_format.unwrap_or(config.output.format)
    }

    /// Sink writing to stdout in the requested style
    pub fn sink(&self, config: &GatesConfig) -> Box<dyn ReportSink> {
        let stdout = io::stdout().lock();
        if self.json {
            Box::new(JsonSink::new(stdout))
        } else {
            Box::new(TextSink::new(stdout, self.output_format(config)))
        }
    }
}

/// `value_parser` for positional source directories
pub fn existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("directory '{}' does not exist", s));
    }
    if !path.is_dir() {
        return Err(format!("'{}' is not a directory", s));
    }
    Ok(path)
}

/// `value_parser` for coverage report directories
pub fn coverage_dir(s: &str) -> Result<PathBuf, String> {
    let path = existing_dir(s)?;
    if !path.join(INDEX_FILE).is_file() {
        return Err(format!("'{}' does not contain {}", s, INDEX_FILE));
    }
    Ok(path)
}

/// Size the global rayon pool; keeps the default when `jobs` is `None`
pub fn configure_threads(jobs: Option<usize>) {
    let Some(num_threads) = jobs else {
        return;
    };
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        warn!("Could not set thread count: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_existing_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.cpp");
        fs::write(&file, "").unwrap();

        assert!(existing_dir(dir.path().to_str().unwrap()).is_ok());
        assert!(existing_dir(file.to_str().unwrap()).is_err());
        assert!(existing_dir(dir.path().join("missing").to_str().unwrap()).is_err());
    }

    #[test]
    fn test_coverage_dir_requires_index() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_str().unwrap();
        assert!(coverage_dir(path).unwrap_err().contains("index.html"));

        fs::write(dir.path().join(INDEX_FILE), "<html></html>").unwrap();
        assert!(coverage_dir(path).is_ok());
    }
}
