//! Source tree discovery
//!
//! Walks a C/C++ source tree with `walkdir`, keeps files with a known
//! source/header extension and groups them by containing directory.
//! The result is an immutable [`ScanResult`] that the aggregators consume,
//! so the scan-wide file total is known before any per-file ratio is computed.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Directory name that is never descended into
pub const IGNORED_DIR: &str = ".git";

/// Errors that can occur while scanning or reading sources
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid source directory: {0}")]
    InvalidPath(String),

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Extensions recognised as C/C++ sources or headers (case-sensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceExtension {
    Hpp,
    Cpp,
    H,
    C,
}

impl SourceExtension {
    /// Match a file extension exactly, without the leading dot
    pub fn from_extension(ext: &OsStr) -> Option<Self> {
        match ext.to_str()? {
            "hpp" => Some(Self::Hpp),
            "cpp" => Some(Self::Cpp),
            "h" => Some(Self::H),
            "c" => Some(Self::C),
            _ => None,
        }
    }
}

impl fmt::Display for SourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hpp => write!(f, ".hpp"),
            Self::Cpp => write!(f, ".cpp"),
            Self::H => write!(f, ".h"),
            Self::C => write!(f, ".c"),
        }
    }
}

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as walked (root joined with the relative path)
    pub path: PathBuf,
    pub extension: SourceExtension,
}

impl SourceFile {
    /// File name without directory, used as the row label in reports
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read the file content. Never cached.
    pub fn read(&self) -> Result<String, ScanError> {
        std::fs::read_to_string(&self.path).map_err(|source| ScanError::Read {
            path: self.path.clone(),
            source,
        })
    }
}

/// All matched files of one directory, in discovery order
#[derive(Debug, Clone)]
pub struct SourceGroup {
    pub directory: PathBuf,
    pub files: Vec<SourceFile>,
}

impl SourceGroup {
    /// Files sorted by base name
    pub fn sorted_files(&self) -> Vec<&SourceFile> {
        let mut files: Vec<&SourceFile> = self.files.iter().collect();
        files.sort_by_key(|f| f.base_name());
        files
    }

    /// Directory label for report headings (`./` prefixes dropped)
    pub fn display_name(&self) -> String {
        display_path(&self.directory)
    }
}

/// Outcome of a single scan pass
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Number of matched files across the whole tree
    pub total_files: usize,
    /// Non-empty directories in traversal order
    pub groups: Vec<SourceGroup>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.groups.iter().flat_map(|g| g.files.iter())
    }
}

/// Scan options
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Patterns matched against the root-relative path; hits are dropped entirely
    pub exclude: Vec<Pattern>,
}

impl ScanOptions {
    fn is_excluded(&self, relative: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let normalized = relative.to_string_lossy().replace('\\', "/");
        self.exclude.iter().any(|p| p.matches(&normalized))
    }
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == IGNORED_DIR
}

/// Walk `root` and collect matching sources grouped by directory
pub fn scan_sources(root: &Path, options: &ScanOptions) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::InvalidPath(root.display().to_string()));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e));

    let mut groups: Vec<SourceGroup> = Vec::new();
    let mut group_index: HashMap<PathBuf, usize> = HashMap::new();
    let mut total_files = 0;

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            group_index.insert(path.to_path_buf(), groups.len());
            groups.push(SourceGroup {
                directory: path.to_path_buf(),
                files: Vec::new(),
            });
            continue;
        }

        let Some(extension) = path.extension().and_then(SourceExtension::from_extension) else {
            continue;
        };

        let relative = path.strip_prefix(root).unwrap_or(path);
        if options.is_excluded(relative) {
            trace!(path = %relative.display(), "excluded by config");
            continue;
        }

        let Some(&idx) = path.parent().and_then(|p| group_index.get(p)) else {
            continue;
        };

        groups[idx].files.push(SourceFile {
            path: path.to_path_buf(),
            extension,
        });
        total_files += 1;
    }

    groups.retain(|g| !g.files.is_empty());

    debug!(
        root = %root.display(),
        total_files,
        directories = groups.len(),
        "scan complete"
    );

    Ok(ScanResult {
        root: root.to_path_buf(),
        total_files,
        groups,
    })
}

/// Render a path for headings, dropping `.` components
pub fn display_path(path: &Path) -> String {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if cleaned.as_os_str().is_empty() {
        ".".to_string()
    } else {
        cleaned.display().to_string()
    }
}
