//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-file validation results with colored severity markers
//! - A run summary with file, error and warning counts
//! - Record, release and release-list display

use crate::domain::{Component, FileReport, Issue, Release, Severity, UrlKind};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Whether an issue is shown at the current verbosity
    fn shows(&self, issue: &Issue) -> bool {
        match self.verbosity {
            Verbosity::Quiet => issue.severity == Severity::Error,
            Verbosity::Normal => issue.severity != Severity::Info,
            Verbosity::Verbose => true,
        }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = format!("{}", severity.marker());
        if !self.color {
            return label;
        }
        match severity {
            Severity::Error => label.red().bold().to_string(),
            Severity::Warning => label.yellow().to_string(),
            Severity::Info => label.dimmed().to_string(),
        }
    }

    fn format_file(&self, file: &FileReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let passed = file.passed();
        if self.verbosity == Verbosity::Quiet && passed {
            return Ok(());
        }

        let path = file.path.display().to_string();
        let id = file
            .id
            .as_deref()
            .map(|id| format!(" ({})", id))
            .unwrap_or_default();
        let status = if passed { "passed" } else { "failed" };

        if self.color {
            let status = if passed {
                status.green().to_string()
            } else {
                status.red().bold().to_string()
            };
            writeln!(writer, "{}{}: {}", path.bold(), id.dimmed(), status)?;
        } else {
            writeln!(writer, "{}{}: {}", path, id, status)?;
        }

        for issue in file.report.issues.iter().filter(|i| self.shows(i)) {
            let tag = if self.color {
                issue.tag.bold().to_string()
            } else {
                issue.tag.clone()
            };
            writeln!(
                writer,
                "  {} {}: {}",
                self.severity_label(issue.severity),
                tag,
                issue.message
            )?;
        }
        Ok(())
    }

    fn field(
        &self,
        label: &str,
        value: Option<&str>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            let label = format!("{:<12}", format!("{}:", label));
            if self.color {
                writeln!(writer, "  {} {}", label.dimmed(), value)
            } else {
                writeln!(writer, "  {} {}", label, value)
            }
        } else {
            Ok(())
        }
    }

    fn release_heading(&self, release: &Release) -> String {
        let date = release
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .or_else(|| release.date.clone())
            .unwrap_or_else(|| "undated".to_string());
        let kind = match release.kind {
            Some(kind) => format!(" [{}]", kind),
            None => String::new(),
        };

        if self.color {
            format!(
                "{} {}{}",
                release.version.bright_white().bold(),
                format!("({})", date).dimmed(),
                kind.cyan()
            )
        } else {
            format!("{} ({}){}", release.version, date, kind)
        }
    }
}

/// Write text indented by two spaces, leaving blank lines empty
fn write_indented(text: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    for line in text.lines() {
        if line.is_empty() {
            writeln!(writer)?;
        } else {
            writeln!(writer, "  {}", line)?;
        }
    }
    Ok(())
}

impl OutputFormatter for TextFormatter {
    fn format_validation(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for file in &result.summary.files {
            self.format_file(file, writer)?;
        }

        let summary = &result.summary;
        let line = format!(
            "{} file(s) checked, {} failed, {} error(s), {} warning(s)",
            summary.files_processed(),
            summary.files_failed(),
            summary.total_errors(),
            summary.total_warnings()
        );

        if self.verbosity != Verbosity::Quiet || !summary.all_passed() {
            if !summary.files.is_empty() {
                writeln!(writer)?;
            }
            if !self.color {
                writeln!(writer, "{}", line)?;
            } else if summary.all_passed() {
                writeln!(writer, "{}", line.green())?;
            } else {
                writeln!(writer, "{}", line.red())?;
            }
        }
        Ok(())
    }

    fn format_component(
        &self,
        component: &Component,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = component.display_name();
        let id = component.id.as_deref().unwrap_or("no id");
        if self.color {
            writeln!(writer, "{} {}", name.bold(), format!("({})", id).dimmed())?;
        } else {
            writeln!(writer, "{} ({})", name, id)?;
        }

        self.field("Summary", component.summary.as_deref(), writer)?;
        self.field("Type", Some(component.kind.as_str()), writer)?;
        self.field("License", component.project_license.as_deref(), writer)?;
        self.field("Metadata", component.metadata_license.as_deref(), writer)?;
        self.field(
            "Developer",
            component.developer.as_ref().map(|d| d.name.as_str()),
            writer,
        )?;
        self.field(
            "Launchable",
            component.launchable.as_ref().map(|l| l.value.as_str()),
            writer,
        )?;
        self.field("Homepage", component.url(&UrlKind::Homepage), writer)?;
        self.field("Bugtracker", component.url(&UrlKind::Bugtracker), writer)?;

        let categories = component.categories.join(", ");
        self.field("Categories", Some(categories.as_str()), writer)?;

        if let Some(latest) = component.latest_release() {
            let releases = format!(
                "{} (latest {})",
                component.releases.len(),
                latest.version
            );
            self.field("Releases", Some(releases.as_str()), writer)?;
        }
        if !component.screenshots.is_empty() {
            let count = component.screenshots.len().to_string();
            self.field("Screenshots", Some(count.as_str()), writer)?;
        }

        if self.verbosity == Verbosity::Verbose {
            for url in &component.urls {
                let label = format!("url:{}", url.kind);
                self.field(&label, Some(url.value.as_str()), writer)?;
            }
        }

        if let Some(ref description) = component.description {
            writeln!(writer)?;
            write_indented(&description.to_plain_text(), writer)?;
        }
        Ok(())
    }

    fn format_release(&self, release: &Release, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "{}", self.release_heading(release))?;
        if let Some(ref url) = release.url {
            self.field("Details", Some(url.as_str()), writer)?;
        }

        let notes = release.notes_text();
        if !notes.is_empty() {
            writeln!(writer)?;
            write_indented(&notes, writer)?;
        }
        Ok(())
    }

    fn format_releases(
        &self,
        releases: &[Release],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if releases.is_empty() {
            if self.verbosity != Verbosity::Quiet {
                writeln!(writer, "No releases")?;
            }
            return Ok(());
        }
        for release in releases {
            writeln!(writer, "{}", self.release_heading(release))?;
        }
        Ok(())
    }
}
