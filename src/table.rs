//! Plain-text and markup table rendering
//!
//! The aggregators hand over a [`Table`] (headers plus typed cells) and an
//! [`OutputFormat`]; everything about borders, padding and alignment lives
//! here. Layouts follow the widely used plain-text table conventions
//! (org-mode, reStructuredText, LaTeX `tabular`, ASCII and box-drawing grids).

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Minimum gap added to every header width
const MIN_PADDING: usize = 2;

/// Closed set of supported table layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Emacs org-mode table
    Orgtbl,
    /// Columns separated by spaces, no rules
    Plain,
    /// Header underlined with dashes
    Simple,
    /// ASCII grid
    Grid,
    /// reStructuredText simple table
    Rst,
    /// LaTeX tabular environment
    Latex,
    /// Box-drawing grid
    #[default]
    #[value(name = "fancy_grid")]
    FancyGrid,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Orgtbl => "orgtbl",
            OutputFormat::Plain => "plain",
            OutputFormat::Simple => "simple",
            OutputFormat::Grid => "grid",
            OutputFormat::Rst => "rst",
            OutputFormat::Latex => "latex",
            OutputFormat::FancyGrid => "fancy_grid",
        };
        write!(f, "{}", name)
    }
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(usize),
    Float(f64),
    /// No data; rendered as `-`
    Missing,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    fn format(&self, precision: usize) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(n) => n.to_string(),
            Cell::Float(v) => format!("{:.*}", precision, v),
            Cell::Missing => "-".to_string(),
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Missing, Cell::Float)
    }
}

/// Headers plus rows of cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// A column is numeric when it has at least one number and no text
    fn is_numeric_column(&self, col: usize) -> bool {
        let mut seen_number = false;
        for cell in self.rows.iter().filter_map(|r| r.get(col)) {
            match cell {
                Cell::Text(_) => return false,
                Cell::Missing => {}
                _ => seen_number = true,
            }
        }
        seen_number
    }
}

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Alignment by column kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignPolicy {
    pub numbers: Align,
    pub text: Align,
}

impl Default for AlignPolicy {
    fn default() -> Self {
        Self {
            numbers: Align::Right,
            text: Align::Left,
        }
    }
}

/// Rendering options shared by every layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub align: AlignPolicy,
    /// Digits after the decimal point for float cells
    pub float_precision: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            align: AlignPolicy::default(),
            float_precision: 2,
        }
    }
}

/// Narrow rendering interface used by the report sinks
pub trait TableRenderer {
    fn render(&self, table: &Table, format: OutputFormat) -> String;
}

/// Built-in renderer for all [`OutputFormat`] layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer {
    pub options: RenderOptions,
}

impl TextRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl TableRenderer for TextRenderer {
    fn render(&self, table: &Table, format: OutputFormat) -> String {
        render_table(table, format, &self.options)
    }
}

/// Horizontal rule: begin, fill, column separator, end
#[derive(Debug, Clone, Copy)]
struct Rule(&'static str, &'static str, &'static str, &'static str);

/// Row delimiters: begin, column separator, end
#[derive(Debug, Clone, Copy)]
struct RowStyle(&'static str, &'static str, &'static str);

#[derive(Debug, Clone, Copy)]
struct Layout {
    above: Option<Rule>,
    below_header: Option<Rule>,
    between_rows: Option<Rule>,
    below: Option<Rule>,
    row: RowStyle,
    padding: usize,
    /// Drop the top and bottom rules when headers are present
    hide_outer_with_headers: bool,
}

impl OutputFormat {
    fn layout(self) -> Layout {
        match self {
            OutputFormat::Plain => Layout {
                above: None,
                below_header: None,
                between_rows: None,
                below: None,
                row: RowStyle("", "  ", ""),
                padding: 0,
                hide_outer_with_headers: false,
            },
            OutputFormat::Simple => Layout {
                above: Some(Rule("", "-", "  ", "")),
                below_header: Some(Rule("", "-", "  ", "")),
                between_rows: None,
                below: Some(Rule("", "-", "  ", "")),
                row: RowStyle("", "  ", ""),
                padding: 0,
                hide_outer_with_headers: true,
            },
            OutputFormat::Grid => Layout {
                above: Some(Rule("+", "-", "+", "+")),
                below_header: Some(Rule("+", "=", "+", "+")),
                between_rows: Some(Rule("+", "-", "+", "+")),
                below: Some(Rule("+", "-", "+", "+")),
                row: RowStyle("|", "|", "|"),
                padding: 1,
                hide_outer_with_headers: false,
            },
            OutputFormat::FancyGrid => Layout {
                above: Some(Rule("╒", "═", "╤", "╕")),
                below_header: Some(Rule("╞", "═", "╪", "╡")),
                between_rows: Some(Rule("├", "─", "┼", "┤")),
                below: Some(Rule("╘", "═", "╧", "╛")),
                row: RowStyle("│", "│", "│"),
                padding: 1,
                hide_outer_with_headers: false,
            },
            OutputFormat::Orgtbl => Layout {
                above: None,
                below_header: Some(Rule("|", "-", "+", "|")),
                between_rows: None,
                below: None,
                row: RowStyle("|", "|", "|"),
                padding: 1,
                hide_outer_with_headers: false,
            },
            OutputFormat::Rst => Layout {
                above: Some(Rule("", "=", "  ", "")),
                below_header: Some(Rule("", "=", "  ", "")),
                between_rows: None,
                below: Some(Rule("", "=", "  ", "")),
                row: RowStyle("", "  ", ""),
                padding: 0,
                hide_outer_with_headers: false,
            },
            // rules are generated by `render_latex`
            OutputFormat::Latex => Layout {
                above: None,
                below_header: Some(Rule("\\hline", "", "", "")),
                between_rows: None,
                below: Some(Rule("\\hline\n\\end{tabular}", "", "", "")),
                row: RowStyle("", "&", "\\\\"),
                padding: 1,
                hide_outer_with_headers: false,
            },
        }
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", cell, width = width),
        Align::Right => format!("{:>width$}", cell, width = width),
    }
}

fn build_row(cells: &[String], style: RowStyle) -> String {
    let RowStyle(begin, sep, end) = style;
    format!("{}{}{}", begin, cells.join(sep), end)
        .trim_end()
        .to_string()
}

fn build_rule(widths: &[usize], rule: Rule) -> String {
    let Rule(begin, fill, sep, end) = rule;
    let cells: Vec<String> = widths.iter().map(|w| fill.repeat(*w)).collect();
    build_row(&cells, RowStyle(begin, sep, end))
}

fn latex_escape(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    for c in cell.chars() {
        match c {
            '&' => out.push_str("\\&"),
            '%' => out.push_str("\\%"),
            '$' => out.push_str("\\$"),
            '#' => out.push_str("\\#"),
            '_' => out.push_str("\\_"),
            '^' => out.push_str("\\^{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            '<' => out.push_str("\\ensuremath{<}"),
            '>' => out.push_str("\\ensuremath{>}"),
            _ => out.push(c),
        }
    }
    out
}

fn latex_begin(aligns: &[Align]) -> String {
    let column_spec: String = aligns
        .iter()
        .map(|a| match a {
            Align::Left => 'l',
            Align::Right => 'r',
        })
        .collect();
    format!("\\begin{{tabular}}{{{}}}\n\\hline", column_spec)
}

/// Render `table` in the requested layout. No trailing newline.
pub fn render_table(table: &Table, format: OutputFormat, options: &RenderOptions) -> String {
    let columns = table.column_count();
    let layout = format.layout();

    let aligns: Vec<Align> = (0..columns)
        .map(|col| {
            if table.is_numeric_column(col) {
                options.align.numbers
            } else {
                options.align.text
            }
        })
        .collect();

    let formatted: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|col| {
                    row.get(col)
                        .map(|c| c.format(options.float_precision))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            let header = table
                .headers
                .get(col)
                .map_or(0, |h| h.chars().count() + MIN_PADDING);
            formatted
                .iter()
                .map(|row| row[col].chars().count())
                .fold(header, usize::max)
        })
        .collect();

    let margin = " ".repeat(layout.padding);
    let align_row = |cells: Vec<String>| -> Vec<String> {
        cells
            .iter()
            .zip(widths.iter().zip(aligns.iter()))
            .map(|(cell, (width, align))| {
                let padded = format!("{}{}{}", margin, pad(cell, *width, *align), margin);
                if format == OutputFormat::Latex {
                    latex_escape(&padded)
                } else {
                    padded
                }
            })
            .collect()
    };

    let header: Vec<String> = (0..columns)
        .map(|col| table.headers.get(col).cloned().unwrap_or_default())
        .collect();
    let has_headers = !table.headers.is_empty();
    let header = align_row(header);
    let rows: Vec<Vec<String>> = formatted.into_iter().map(align_row).collect();

    let padded_widths: Vec<usize> = widths.iter().map(|w| w + 2 * layout.padding).collect();
    let hide_outer = has_headers && layout.hide_outer_with_headers;

    let mut lines: Vec<String> = Vec::new();

    if format == OutputFormat::Latex {
        lines.push(latex_begin(&aligns));
    } else if let Some(rule) = layout.above
        && !hide_outer
    {
        lines.push(build_rule(&padded_widths, rule));
    }

    if has_headers {
        lines.push(build_row(&header, layout.row));
        if let Some(rule) = layout.below_header {
            lines.push(build_rule(&padded_widths, rule));
        }
    }

    for (i, row) in rows.iter().enumerate() {
        lines.push(build_row(row, layout.row));
        if let Some(rule) = layout.between_rows
            && i + 1 < rows.len()
        {
            lines.push(build_rule(&padded_widths, rule));
        }
    }

    if let Some(rule) = layout.below
        && !hide_outer
    {
        lines.push(build_rule(&padded_widths, rule));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupling_table() -> Table {
        let mut table = Table::new(["file", "coupling"]);
        table.push(vec![Cell::text("x.cpp"), Cell::Float(20.0)]);
        table.push(vec![Cell::text("y.cpp"), Cell::Float(0.0)]);
        table
    }

    fn render(format: OutputFormat) -> String {
        render_table(&coupling_table(), format, &RenderOptions::default())
    }

    #[test]
    fn test_fancy_grid() {
        let expected = "\
╒════════╤════════════╕
│ file   │   coupling │
╞════════╪════════════╡
│ x.cpp  │      20.00 │
├────────┼────────────┤
│ y.cpp  │       0.00 │
╘════════╧════════════╛";
        assert_eq!(render(OutputFormat::FancyGrid), expected);
    }

    #[test]
    fn test_grid() {
        let expected = "\
+--------+------------+
| file   |   coupling |
+========+============+
| x.cpp  |      20.00 |
+--------+------------+
| y.cpp  |       0.00 |
+--------+------------+";
        assert_eq!(render(OutputFormat::Grid), expected);
    }

    #[test]
    fn test_simple_hides_outer_rules() {
        let expected = "\
file      coupling
------  ----------
x.cpp        20.00
y.cpp         0.00";
        assert_eq!(render(OutputFormat::Simple), expected);
    }

    #[test]
    fn test_plain() {
        let expected = "\
file      coupling
x.cpp        20.00
y.cpp         0.00";
        assert_eq!(render(OutputFormat::Plain), expected);
    }

    #[test]
    fn test_orgtbl() {
        let expected = "\
| file   |   coupling |
|--------+------------|
| x.cpp  |      20.00 |
| y.cpp  |       0.00 |";
        assert_eq!(render(OutputFormat::Orgtbl), expected);
    }

    #[test]
    fn test_rst() {
        let expected = "\
======  ==========
file      coupling
======  ==========
x.cpp        20.00
y.cpp         0.00
======  ==========";
        assert_eq!(render(OutputFormat::Rst), expected);
    }

    #[test]
    fn test_latex_escapes_cells() {
        let mut table = Table::new(["file", "todos"]);
        table.push(vec![Cell::text("my_file.c"), Cell::Int(3)]);
        let out = render_table(&table, OutputFormat::Latex, &RenderOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "\\begin{tabular}{lr}");
        assert_eq!(lines[1], "\\hline");
        assert!(lines[2].starts_with(" file"));
        assert!(lines[2].ends_with("\\\\"));
        assert_eq!(lines[3], "\\hline");
        assert!(lines[4].contains("my\\_file.c"));
        assert_eq!(lines[5], "\\hline");
        assert_eq!(lines[6], "\\end{tabular}");
    }

    #[test]
    fn test_missing_cells_keep_numeric_alignment() {
        let mut table = Table::new(["file", "lines", "functions"]);
        table.push(vec![Cell::text("a.cpp"), Cell::Float(95.5), Cell::Missing]);
        table.push(vec![Cell::text("b.cpp"), Cell::Float(80.0), Cell::Float(50.0)]);
        let out = render_table(&table, OutputFormat::Plain, &RenderOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "a.cpp     95.50            -");
        assert_eq!(lines[2], "b.cpp     80.00        50.00");
    }

    #[test]
    fn test_headers_only() {
        let table = Table::new(["file", "coupling"]);
        let out = render_table(&table, OutputFormat::Grid, &RenderOptions::default());
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_float_precision() {
        let mut table = Table::new(["v"]);
        table.push(vec![Cell::Float(1.0 / 3.0)]);
        let options = RenderOptions {
            float_precision: 4,
            ..RenderOptions::default()
        };
        let out = render_table(&table, OutputFormat::Plain, &options);
        assert!(out.ends_with("0.3333"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::FancyGrid.to_string(), "fancy_grid");
        assert_eq!(
            OutputFormat::from_str("fancy_grid", false).unwrap(),
            OutputFormat::FancyGrid
        );
        assert_eq!(
            OutputFormat::from_str("orgtbl", false).unwrap(),
            OutputFormat::Orgtbl
        );
    }
}
