//! Local include coupling report
//!
//! For every source file the coupling ratio is the number of local
//! (`#include "..."`) directives divided by the number of source files in the
//! whole scanned tree, as a percentage. Files are reported per directory,
//! sorted by name, and every ratio strictly above the threshold is a failure.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::gate::{
    DEFAULT_COUPLING_THRESHOLD, FailureCounter, Threshold, coupling_percentage, format_threshold,
};
use crate::output::{DirectoryTable, ReportSink};
use crate::patterns::count_local_includes;
use crate::scanner::{ScanError, ScanResult, SourceFile, SourceGroup};
use crate::table::{Cell, Table};

/// File that `ignore_main` drops from the report when it sits at the root
pub const MAIN_FILE: &str = "main.cpp";

/// Options for a coupling run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CouplingOptions {
    pub threshold: f64,
    /// Drop the root-level `main.cpp` row (it still counts towards the total)
    pub ignore_main: bool,
    /// Only print failing rows; failure counting is unaffected
    pub only_show_failures: bool,
}

impl Default for CouplingOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COUPLING_THRESHOLD,
            ignore_main: true,
            only_show_failures: false,
        }
    }
}

/// Coupling of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouplingRow {
    pub file: String,
    pub local_includes: usize,
    /// Percentage, not clamped
    pub coupling: f64,
    pub failed: bool,
}

/// Per-directory totals for the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorySummary {
    pub directory: String,
    pub files: usize,
    pub max_coupling: Option<f64>,
    pub failures: usize,
}

/// Result of a whole coupling run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CouplingSummary {
    pub total_files: usize,
    pub directories: Vec<DirectorySummary>,
    pub failures: usize,
}

impl CouplingSummary {
    /// Directory overview with a trailing `TOTAL` row
    pub fn summary_table(&self) -> Table {
        let mut table = Table::new(["directory", "files", "max coupling", "failures"]);
        for dir in &self.directories {
            table.push(vec![
                Cell::text(dir.directory.as_str()),
                Cell::Int(dir.files),
                Cell::from(dir.max_coupling),
                Cell::Int(dir.failures),
            ]);
        }

        let files = self.directories.iter().map(|d| d.files).sum();
        let max = self
            .directories
            .iter()
            .filter_map(|d| d.max_coupling)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        table.push(vec![
            Cell::text("TOTAL"),
            Cell::Int(files),
            Cell::from(max),
            Cell::Int(self.failures),
        ]);
        table
    }
}

fn is_root_main(scan: &ScanResult, file: &SourceFile) -> bool {
    file.path == scan.root.join(MAIN_FILE)
}

fn coupling_row(
    file: &SourceFile,
    total_files: usize,
    threshold: &Threshold,
) -> Result<CouplingRow, ScanError> {
    let content = file.read()?;
    let local_includes = count_local_includes(&content);
    let coupling = coupling_percentage(local_includes, total_files);

    Ok(CouplingRow {
        file: file.base_name(),
        local_includes,
        coupling,
        failed: threshold.is_violated_by(coupling),
    })
}

/// Compute the rows of one directory, sorted by file name.
///
/// Files are read in parallel; row order does not depend on scheduling.
pub fn coupling_rows(
    scan: &ScanResult,
    group: &SourceGroup,
    options: &CouplingOptions,
) -> Result<Vec<CouplingRow>, ScanError> {
    let threshold = Threshold::above(options.threshold);
    let files: Vec<&SourceFile> = group
        .sorted_files()
        .into_iter()
        .filter(|f| !(options.ignore_main && is_root_main(scan, f)))
        .collect();

    files
        .par_iter()
        .map(|f| coupling_row(f, scan.total_files, &threshold))
        .collect()
}

fn directory_table(rows: &[CouplingRow], only_show_failures: bool) -> Table {
    let mut table = Table::new(["file", "coupling"]);
    for row in rows.iter().filter(|r| r.failed || !only_show_failures) {
        table.push(vec![Cell::text(row.file.as_str()), Cell::Float(row.coupling)]);
    }
    table
}

/// Run the coupling report over a finished scan.
///
/// Directory tables go to `sink` in scan order as each one completes, followed
/// by the summary table. An empty scan reports nothing and has no failures.
pub fn build_coupling_report(
    scan: &ScanResult,
    options: &CouplingOptions,
    sink: &mut dyn ReportSink,
) -> Result<CouplingSummary, ScanError> {
    if scan.is_empty() {
        info!(root = %scan.root.display(), "no sources found");
        return Ok(CouplingSummary::default());
    }

    sink.heading(&format!(
        "checking local coupling with threshold of {}:",
        format_threshold(options.threshold)
    ))?;

    let mut failures = FailureCounter::new();
    let mut directories = Vec::with_capacity(scan.groups.len());

    for group in &scan.groups {
        let rows = coupling_rows(scan, group, options)?;
        let dir_failures = rows.iter().filter(|r| r.failed).count();
        failures.add(dir_failures);

        let directory = group.display_name();
        debug!(
            directory = %directory,
            files = rows.len(),
            failures = dir_failures,
            "directory analyzed"
        );

        sink.directory(&DirectoryTable {
            directory: directory.clone(),
            table: directory_table(&rows, options.only_show_failures),
        })?;

        directories.push(DirectorySummary {
            directory,
            files: rows.len(),
            max_coupling: rows.iter().map(|r| r.coupling).reduce(f64::max),
            failures: dir_failures,
        });
    }

    let summary = CouplingSummary {
        total_files: scan.total_files,
        directories,
        failures: failures.total(),
    };
    sink.summary("summary", &summary.summary_table())?;

    info!(
        total_files = summary.total_files,
        failures = summary.failures,
        "coupling check complete"
    );

    Ok(summary)
}
