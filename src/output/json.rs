//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of validation runs
//! - Records and releases as serialized by their serde derives

use crate::domain::{Component, Issue, Release, Severity};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a validation run
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether every file passed
    passed: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-file results
    files: Vec<JsonFile<'a>>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    files: usize,
    failed: usize,
    errors: usize,
    warnings: usize,
}

/// JSON representation of a file result
#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    passed: bool,
    issues: Vec<&'a Issue>,
}

/// A release together with its plain-text notes
#[derive(Serialize)]
struct JsonRelease<'a> {
    #[serde(flatten)]
    release: &'a Release,
    #[serde(skip_serializing_if = "Option::is_none")]
    released: Option<String>,
    notes: String,
}

impl<'a> JsonRelease<'a> {
    fn new(release: &'a Release) -> Self {
        Self {
            release,
            released: release.date().map(|d| d.format("%Y-%m-%d").to_string()),
            notes: release.notes_text(),
        }
    }
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)
}

impl OutputFormatter for JsonFormatter {
    fn format_validation(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let summary = &result.summary;
        let files = summary
            .files
            .iter()
            .map(|f| JsonFile {
                path: f.path.display().to_string(),
                id: f.id.as_deref(),
                passed: f.passed(),
                issues: f
                    .report
                    .issues
                    .iter()
                    .filter(|i| {
                        self.verbosity == Verbosity::Verbose || i.severity != Severity::Info
                    })
                    .collect(),
            })
            .collect();

        let output = JsonOutput {
            passed: summary.all_passed() && result.errors.is_empty(),
            summary: JsonSummary {
                files: summary.files_processed(),
                failed: summary.files_failed(),
                errors: summary.total_errors(),
                warnings: summary.total_warnings(),
            },
            files,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };
        write_json(&output, writer)
    }

    fn format_component(
        &self,
        component: &Component,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        write_json(component, writer)
    }

    fn format_release(&self, release: &Release, writer: &mut dyn Write) -> std::io::Result<()> {
        write_json(&JsonRelease::new(release), writer)
    }

    fn format_releases(
        &self,
        releases: &[Release],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let releases: Vec<JsonRelease<'_>> = releases.iter().map(JsonRelease::new).collect();
        write_json(&releases, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Block, Description, FileReport, ReleaseKind, ValidationReport, ValidationSummary,
    };
    use crate::orchestrator::OrchestratorError;
    use serde_json::Value;

    fn to_value<F>(f: F) -> Value
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    fn result() -> OrchestratorResult {
        let mut report = ValidationReport::new();
        report.push(Issue::error("releases-not-sorted", "release 1.0 is listed before 2.0"));
        report.push(Issue::info("unknown-tag", "unrecognised element <x> kept as-is"));
        let mut summary = ValidationSummary::new();
        summary.add_file(FileReport::new(
            "a.metainfo.xml",
            Some("org.example.App".to_string()),
            report,
        ));
        OrchestratorResult {
            summary,
            errors: vec![OrchestratorError::DetectionError(
                "no metainfo files found in /tmp/x".to_string(),
            )],
        }
    }

    #[test]
    fn test_validation_json() {
        let value = to_value(|w| JsonFormatter::new(Verbosity::Normal).format_validation(&result(), w));
        assert_eq!(value["passed"], false);
        assert_eq!(value["summary"]["files"], 1);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["summary"]["errors"], 1);
        assert_eq!(value["files"][0]["id"], "org.example.App");
        assert_eq!(value["files"][0]["issues"].as_array().unwrap().len(), 1);
        assert_eq!(value["files"][0]["issues"][0]["severity"], "error");
        assert_eq!(value["files"][0]["issues"][0]["tag"], "releases-not-sorted");
        assert_eq!(value["errors"][0], "no metainfo files found in /tmp/x");
    }

    #[test]
    fn test_validation_json_verbose_includes_info() {
        let value =
            to_value(|w| JsonFormatter::new(Verbosity::Verbose).format_validation(&result(), w));
        assert_eq!(value["files"][0]["issues"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_release_json() {
        let release = Release::new("3.11.4")
            .with_date("2023-10-11")
            .with_kind(ReleaseKind::Stable)
            .with_description(Description::new(vec![Block::paragraph(
                "This release only updates dependencies.",
            )]));
        let value = to_value(|w| JsonFormatter::new(Verbosity::Normal).format_release(&release, w));
        assert_eq!(value["version"], "3.11.4");
        assert_eq!(value["date"], "2023-10-11");
        assert_eq!(value["type"], "stable");
        assert_eq!(value["released"], "2023-10-11");
        assert_eq!(value["notes"], "This release only updates dependencies.");
        assert_eq!(value["description"][0]["type"], "paragraph");
    }

    #[test]
    fn test_component_json() {
        let mut c = Component::desktop_application();
        c.id = Some("org.example.App".to_string());
        c.releases = vec![Release::new("1.0")];
        let value = to_value(|w| JsonFormatter::new(Verbosity::Normal).format_component(&c, w));
        assert_eq!(value["type"], "desktop-application");
        assert_eq!(value["id"], "org.example.App");
        assert_eq!(value["releases"][0]["version"], "1.0");
    }
}
