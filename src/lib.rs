//! # source-gates - Static Source-Quality Gates
//!
//! Pre-merge checks for C/C++ source trees, each exiting non-zero when a
//! threshold is violated.
//!
//! ## Overview
//!
//! 1. **Coupling** - for each source file, the number of local
//!    (`#include "..."`) includes relative to the number of source files in
//!    the whole tree
//! 2. **Coverage** - line and function percentages read from a genhtml-style
//!    HTML report
//! 3. **TODOs** - `TODO`/`FIXME` markers left in the sources
//!
//! ## Usage
//!
//! ```bash
//! # Fail when any file includes more than 15% of the tree locally
//! check-coupling -t 15 ./src
//!
//! # Fail for every directory below 85% line coverage
//! check-coverage -t 85 ./coverage
//!
//! # Fail on any TODO/FIXME
//! check-todo --output-format orgtbl ./src
//! ```
//!
//! ## Coupling Ratio
//!
//! ```text
//! COUPLING(file) = 100 * LOCAL_INCLUDES(file) / SOURCE_FILES(tree)
//! ```
//!
//! The exit status of each check is its failure count (see [`exit`]).

pub mod cli;
pub mod config;
pub mod coupling;
pub mod coverage;
pub mod exit;
pub mod gate;
pub mod logging;
pub mod output;
pub mod patterns;
pub mod scanner;
pub mod table;
pub mod todo;

pub use config::{ConfigError, GatesConfig, load_config, parse_config};
pub use coupling::{
    CouplingOptions, CouplingRow, CouplingSummary, DirectorySummary, build_coupling_report,
    coupling_rows,
};
pub use coverage::{
    CoverageEntry, CoverageError, CoverageOptions, CoverageSummary, build_coverage_report,
    parse_index,
};
pub use exit::GateExit;
pub use gate::{
    DEFAULT_COUPLING_THRESHOLD, DEFAULT_COVERAGE_THRESHOLD, Direction, FailureCounter, Threshold,
    coupling_percentage,
};
pub use logging::init_logging;
pub use output::{DirectoryTable, JsonSink, MemorySink, ReportSink, TextSink};
pub use patterns::{count_local_includes, count_todo_markers};
pub use scanner::{ScanError, ScanOptions, ScanResult, SourceFile, SourceGroup, scan_sources};
pub use table::{Cell, OutputFormat, Table, TableRenderer, TextRenderer, render_table};
pub use todo::{TodoSummary, build_todo_report};
