//! Validation result types
//!
//! Provides structures for tracking validation results at file and overall levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only
    Info,
    /// Should be fixed, does not fail validation (unless strict)
    Warning,
    /// Schema violation, fails validation
    Error,
}

impl Severity {
    /// Single-letter marker used in compact output
    pub fn marker(&self) -> char {
        match self {
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    /// Stable machine-readable tag, e.g. `release-version-duplicate`
    pub tag: String,
    /// Human-readable explanation
    pub message: String,
}

impl Issue {
    /// Create an error issue
    pub fn error(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create a warning issue
    pub fn warning(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            tag: tag.into(),
            message: message.into(),
        }
    }

    /// Create an info issue
    pub fn info(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            tag: tag.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.tag, self.message)
    }
}

/// Validation result for a single record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an issue
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Number of issues with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Number of errors
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns true when there is no error
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if an issue with this tag is present
    pub fn has_tag(&self, tag: &str) -> bool {
        self.issues.iter().any(|i| i.tag == tag)
    }

    /// Issues with this tag
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |i| i.tag == tag)
    }
}

/// Validation outcome for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path of the metainfo file
    pub path: PathBuf,
    /// Component id, when the file could be decoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub report: ValidationReport,
}

impl FileReport {
    /// Create a new FileReport
    pub fn new(path: impl Into<PathBuf>, id: Option<String>, report: ValidationReport) -> Self {
        Self {
            path: path.into(),
            id,
            report,
        }
    }

    /// Returns true when the file passed validation
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
}

/// Overall summary of a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Results for each file processed
    pub files: Vec<FileReport>,
}

impl ValidationSummary {
    /// Creates a new ValidationSummary
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file result
    pub fn add_file(&mut self, file: FileReport) {
        self.files.push(file);
    }

    /// Returns the total number of files processed
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    /// Returns the number of files that failed validation
    pub fn files_failed(&self) -> usize {
        self.files.iter().filter(|f| !f.passed()).count()
    }

    /// Returns the total number of errors across all files
    pub fn total_errors(&self) -> usize {
        self.files.iter().map(|f| f.report.error_count()).sum()
    }

    /// Returns the total number of warnings across all files
    pub fn total_warnings(&self) -> usize {
        self.files.iter().map(|f| f.report.warning_count()).sum()
    }

    /// Returns true when every file passed
    pub fn all_passed(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }
}
