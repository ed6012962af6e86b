//! Report sinks
//!
//! Aggregators stream one [`DirectoryTable`] per directory into a
//! [`ReportSink`] as soon as it is complete. The text sink renders and prints
//! it right away; the JSON sink collects everything and writes a single
//! document when the run finishes.

use std::io::{self, Write};

use serde::Serialize;

use crate::table::{OutputFormat, Table, TableRenderer, TextRenderer};

/// The table produced for one directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryTable {
    pub directory: String,
    pub table: Table,
}

/// Destination for report tables
pub trait ReportSink {
    /// One-line heading printed before any table
    fn heading(&mut self, text: &str) -> io::Result<()>;

    /// A finished directory table
    fn directory(&mut self, report: &DirectoryTable) -> io::Result<()>;

    /// The run-wide table printed after all directories
    fn summary(&mut self, title: &str, table: &Table) -> io::Result<()>;

    /// Called once at the end of a run with the failure tally
    fn finish(&mut self, _failures: usize) -> io::Result<()> {
        Ok(())
    }
}

/// Renders tables to a writer as they arrive
pub struct TextSink<W: Write, R: TableRenderer = TextRenderer> {
    writer: W,
    renderer: R,
    format: OutputFormat,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self::with_renderer(writer, TextRenderer::default(), format)
    }
}

impl<W: Write, R: TableRenderer> TextSink<W, R> {
    pub fn with_renderer(writer: W, renderer: R, format: OutputFormat) -> Self {
        Self {
            writer,
            renderer,
            format,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn titled(&mut self, title: &str, table: &Table) -> io::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}:", title)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.renderer.render(table, self.format))?;
        self.writer.flush()
    }
}

impl<W: Write, R: TableRenderer> ReportSink for TextSink<W, R> {
    fn heading(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)
    }

    fn directory(&mut self, report: &DirectoryTable) -> io::Result<()> {
        self.titled(&report.directory, &report.table)
    }

    fn summary(&mut self, title: &str, table: &Table) -> io::Result<()> {
        self.titled(title, table)
    }
}

#[derive(Debug, Clone, Serialize)]
struct JsonSummary {
    title: String,
    table: Table,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    heading: Option<&'a str>,
    directories: &'a [DirectoryTable],
    summary: Option<&'a JsonSummary>,
    failures: usize,
}

/// Collects all tables and writes one JSON document on [`ReportSink::finish`]
pub struct JsonSink<W: Write> {
    writer: W,
    heading: Option<String>,
    directories: Vec<DirectoryTable>,
    summary: Option<JsonSummary>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            heading: None,
            directories: Vec::new(),
            summary: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn heading(&mut self, text: &str) -> io::Result<()> {
        self.heading = Some(text.to_string());
        Ok(())
    }

    fn directory(&mut self, report: &DirectoryTable) -> io::Result<()> {
        self.directories.push(report.clone());
        Ok(())
    }

    fn summary(&mut self, title: &str, table: &Table) -> io::Result<()> {
        self.summary = Some(JsonSummary {
            title: title.to_string(),
            table: table.clone(),
        });
        Ok(())
    }

    fn finish(&mut self, failures: usize) -> io::Result<()> {
        let report = JsonReport {
            heading: self.heading.as_deref(),
            directories: &self.directories,
            summary: self.summary.as_ref(),
            failures,
        };
        serde_json::to_writer_pretty(&mut self.writer, &report)?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

/// Keeps tables in memory; handy for tests and library callers
#[derive(Debug, Default)]
pub struct MemorySink {
    pub headings: Vec<String>,
    pub directories: Vec<DirectoryTable>,
    pub summaries: Vec<(String, Table)>,
}

impl ReportSink for MemorySink {
    fn heading(&mut self, text: &str) -> io::Result<()> {
        self.headings.push(text.to_string());
        Ok(())
    }

    fn directory(&mut self, report: &DirectoryTable) -> io::Result<()> {
        self.directories.push(report.clone());
        Ok(())
    }

    fn summary(&mut self, title: &str, table: &Table) -> io::Result<()> {
        self.summaries.push((title.to_string(), table.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn sample() -> DirectoryTable {
        let mut table = Table::new(["file", "todos"]);
        table.push(vec![Cell::text("a.cpp"), Cell::Int(2)]);
        DirectoryTable {
            directory: "src".to_string(),
            table,
        }
    }

    #[test]
    fn test_text_sink_layout() {
        let mut sink = TextSink::new(Vec::new(), OutputFormat::Plain);
        sink.heading("checking").unwrap();
        sink.directory(&sample()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "checking\n\nsrc:\n\nfile      todos\na.cpp         2\n");
    }

    #[test]
    fn test_json_sink_writes_on_finish() {
        let mut sink = JsonSink::new(Vec::new());
        sink.directory(&sample()).unwrap();
        sink.summary("total", &Table::new(["directories", "todos"]))
            .unwrap();
        sink.finish(1).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["failures"], 1);
        assert_eq!(value["directories"][0]["directory"], "src");
        assert_eq!(value["directories"][0]["table"]["rows"][0][0], "a.cpp");
        assert_eq!(value["directories"][0]["table"]["rows"][0][1], 2);
        assert_eq!(value["summary"]["title"], "total");
    }

    #[test]
    fn test_json_sink_is_silent_until_finish() {
        let mut sink = JsonSink::new(Vec::new());
        sink.directory(&sample()).unwrap();
        assert!(sink.into_inner().is_empty());
    }
}
