//! TODO/FIXME marker report
//!
//! Uses the same scan as the coupling report. Only files with at least one
//! marker become rows, and directories without any marker are left out of
//! the output. Any marker at all fails the check.

use serde::Serialize;
use tracing::{debug, info};

use crate::output::{DirectoryTable, ReportSink};
use crate::patterns::count_todo_markers;
use crate::scanner::{ScanError, ScanResult};
use crate::table::{Cell, Table};

/// Marker count of one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoDirectory {
    pub directory: String,
    pub todos: usize,
}

/// Result of a TODO run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoSummary {
    /// Directories with at least one marker, in scan order
    pub directories: Vec<TodoDirectory>,
    pub total: usize,
}

impl TodoSummary {
    pub fn has_todos(&self) -> bool {
        self.total > 0
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new(["directories", "todos"]);
        for dir in &self.directories {
            table.push(vec![Cell::text(dir.directory.as_str()), Cell::Int(dir.todos)]);
        }
        table.push(vec![Cell::text("TOTAL"), Cell::Int(self.total)]);
        table
    }
}

/// Count markers across a finished scan, streaming one table per directory.
///
/// The summary table is only emitted when something was found.
pub fn build_todo_report(
    scan: &ScanResult,
    sink: &mut dyn ReportSink,
) -> Result<TodoSummary, ScanError> {
    let mut summary = TodoSummary::default();

    for group in &scan.groups {
        let mut table = Table::new(["file", "todos"]);
        let mut directory_total = 0;

        for file in group.sorted_files() {
            let todos = count_todo_markers(&file.read()?);
            if todos > 0 {
                table.push(vec![Cell::text(file.base_name()), Cell::Int(todos)]);
                directory_total += todos;
            }
        }

        if directory_total == 0 {
            continue;
        }

        let directory = group.display_name();
        debug!(directory = %directory, todos = directory_total, "markers found");

        sink.directory(&DirectoryTable {
            directory: directory.clone(),
            table,
        })?;

        summary.directories.push(TodoDirectory {
            directory,
            todos: directory_total,
        });
        summary.total += directory_total;
    }

    if summary.has_todos() {
        sink.summary("total", &summary.summary_table())?;
    }

    info!(total = summary.total, "todo check complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use crate::scanner::{ScanOptions, scan_sources};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn run(root: &Path) -> (TodoSummary, MemorySink) {
        let scan = scan_sources(root, &ScanOptions::default()).unwrap();
        let mut sink = MemorySink::default();
        let summary = build_todo_report(&scan, &mut sink).unwrap();
        (summary, sink)
    }

    #[test]
    fn test_counts_mixed_case_markers() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.cpp", "// fixme: later\nint x; /* TODO fix */\n");

        let (summary, sink) = run(dir.path());
        assert_eq!(summary.total, 2);
        assert_eq!(
            sink.directories[0].table.rows[0],
            vec![Cell::text("a.cpp"), Cell::Int(2)]
        );
    }

    #[test]
    fn test_clean_files_are_not_rows() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/b.cpp", "// TODO\n");
        write(dir.path(), "src/a.cpp", "int a;\n");

        let (_, sink) = run(dir.path());
        let table = &sink.directories[0].table;
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], Cell::text("b.cpp"));
    }

    #[test]
    fn test_directory_without_markers_is_omitted() {
        // unlike the coupling report, matched files alone do not keep a directory
        let dir = TempDir::new().unwrap();
        write(dir.path(), "clean/a.cpp", "int a;\n");
        write(dir.path(), "dirty/b.h", "// FIXME\n");

        let (summary, sink) = run(dir.path());
        assert_eq!(sink.directories.len(), 1);
        assert!(sink.directories[0].directory.ends_with("dirty"));
        assert_eq!(summary.directories.len(), 1);
    }

    #[test]
    fn test_summary_table_has_total() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a/x.c", "// TODO\n// TODO\n");
        write(dir.path(), "b/y.c", "// todo\n");

        let (summary, sink) = run(dir.path());
        assert_eq!(summary.total, 3);
        let (title, table) = &sink.summaries[0];
        assert_eq!(title, "total");
        assert_eq!(
            table.rows.last().unwrap(),
            &vec![Cell::text("TOTAL"), Cell::Int(3)]
        );
    }

    #[test]
    fn test_no_markers_no_output() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.cpp", "int main() {}\n");

        let (summary, sink) = run(dir.path());
        assert!(!summary.has_todos());
        assert!(sink.directories.is_empty());
        assert!(sink.summaries.is_empty());
    }

    #[test]
    fn test_main_is_not_excluded() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "main.cpp", "// TODO: parse args\n");

        let (summary, _) = run(dir.path());
        assert_eq!(summary.total, 1);
    }
}
