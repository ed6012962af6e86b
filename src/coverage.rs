//! Coverage index summary
//!
//! Reads the two-level HTML index written by genhtml-style coverage tools:
//! a top-level `index.html` lists one row per directory and links to a
//! per-directory index listing the files. Each row carries a line and a
//! function percentage; only the line percentage of top-level rows is gated.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::gate::{DEFAULT_COVERAGE_THRESHOLD, FailureCounter, Threshold, format_threshold};
use crate::output::{DirectoryTable, ReportSink};
use crate::table::{Cell, Table};

/// Name of the top-level index inside a coverage directory
pub const INDEX_FILE: &str = "index.html";

/// Function cell value meaning "no function data"
const NO_DATA: &str = "-";

static FILE_CELL_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<td\s+class="coverFile""#).expect("valid cover file regex"));

static FILE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^<td\s+class="coverFile"[^>]*>\s*<a\s+href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid cover link regex")
});

static PERCENT_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<td\s+class="coverPer[^"]*"[^>]*>([^<]*)</td>"#)
        .expect("valid cover percentage regex")
});

/// Errors that can occur while summarizing a coverage report
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Coverage index not found: {}", .0.display())]
    MissingIndex(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed coverage index {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// One row of a coverage index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub name: String,
    /// Link target, relative to the coverage directory for top-level rows
    pub index_file: String,
    pub lines: f64,
    /// `None` when the index shows no function data
    pub functions: Option<f64>,
}

impl CoverageEntry {
    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.name.as_str()),
            Cell::Float(self.lines),
            Cell::from(self.functions),
        ]
    }
}

/// Options for a coverage run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageOptions {
    /// Minimum line coverage, in percent
    pub threshold: f64,
    /// Only print rows below the threshold; failure counting is unaffected
    pub only_show_failures: bool,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COVERAGE_THRESHOLD,
            only_show_failures: false,
        }
    }
}

/// Result of a coverage run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Top-level entries in document order
    pub directories: Vec<CoverageEntry>,
    pub failures: usize,
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn clean_percentage(raw: &str) -> String {
    decode_entities(raw)
        .trim()
        .trim_end_matches('%')
        .trim()
        .to_string()
}

fn parse_percentage(raw: &str) -> Option<f64> {
    clean_percentage(raw).parse().ok()
}

/// Extract all file/directory rows from one index page
pub fn parse_index(html: &str, path: &Path) -> Result<Vec<CoverageEntry>, CoverageError> {
    let malformed = |reason: String| CoverageError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let starts: Vec<usize> = FILE_CELL_START_RE
        .find_iter(html)
        .map(|m| m.start())
        .collect();

    let mut entries = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(html.len());
        let row = &html[start..end];

        let link = FILE_LINK_RE
            .captures(row)
            .ok_or_else(|| malformed(format!("row {} has no link", i + 1)))?;
        let index_file = decode_entities(&link[1]);
        let name = decode_entities(link[2].trim());

        let percentages: Vec<&str> = PERCENT_CELL_RE
            .captures_iter(row)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .take(2)
            .collect();
        let &[lines_raw, functions_raw] = percentages.as_slice() else {
            return Err(malformed(format!(
                "row '{}' has {} percentage cells, expected 2",
                name,
                percentages.len()
            )));
        };

        let lines = parse_percentage(lines_raw).ok_or_else(|| {
            malformed(format!("row '{}' has invalid line coverage '{}'", name, lines_raw))
        })?;
        let functions = if clean_percentage(functions_raw) == NO_DATA {
            None
        } else {
            Some(parse_percentage(functions_raw).ok_or_else(|| {
                malformed(format!(
                    "row '{}' has invalid function coverage '{}'",
                    name, functions_raw
                ))
            })?)
        };

        entries.push(CoverageEntry {
            name,
            index_file,
            lines,
            functions,
        });
    }

    Ok(entries)
}

fn read_index(path: &Path) -> Result<Vec<CoverageEntry>, CoverageError> {
    let html = fs::read_to_string(path).map_err(|source| CoverageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_index(&html, path)
}

/// Summarize a coverage directory.
///
/// Each top-level entry whose line coverage is strictly below the threshold
/// is a failure; function coverage is reported but never gated. Per-directory
/// tables are streamed to `sink`, followed by the aggregate table.
pub fn build_coverage_report(
    coverage_dir: &Path,
    options: &CoverageOptions,
    sink: &mut dyn ReportSink,
) -> Result<CoverageSummary, CoverageError> {
    let index = coverage_dir.join(INDEX_FILE);
    if !index.is_file() {
        return Err(CoverageError::MissingIndex(index));
    }

    let threshold = Threshold::below(options.threshold);
    let shown = |entry: &CoverageEntry| {
        !options.only_show_failures || threshold.is_violated_by(entry.lines)
    };

    sink.heading(&format!(
        "checking line coverage with threshold of {}:",
        format_threshold(options.threshold)
    ))?;

    let directories = read_index(&index)?;
    let mut failures = FailureCounter::new();

    for entry in &directories {
        let failed = failures.record(threshold.is_violated_by(entry.lines));
        debug!(directory = %entry.name, lines = entry.lines, failed, "directory coverage");

        let files = read_index(&coverage_dir.join(&entry.index_file))?;
        let mut table = Table::new(["file", "lines", "functions"]);
        for file in files.iter().filter(|&f| shown(f)) {
            table.push(file.row());
        }

        sink.directory(&DirectoryTable {
            directory: entry.name.clone(),
            table,
        })?;
    }

    let mut aggregate = Table::new(["directory", "lines", "functions"]);
    for entry in directories.iter().filter(|&e| shown(e)) {
        aggregate.push(entry.row());
    }
    sink.summary("total directory coverage", &aggregate)?;

    info!(
        directories = directories.len(),
        failures = failures.total(),
        "coverage check complete"
    );

    Ok(CoverageSummary {
        directories,
        failures: failures.total(),
    })
}
