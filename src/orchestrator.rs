//! Validation orchestrator for coordinating a whole run
//!
//! This module provides:
//! - Workflow coordination: detect → parse → validate → probe URLs
//! - Concurrent URL probing with a shared limit
//! - Error handling with partial continuation

use crate::config::Config;
use crate::domain::{FileReport, Issue, ValidationReport, ValidationSummary};
use crate::metainfo::{detect_metainfo, read_metainfo};
use crate::net::{collect_urls, HttpProbe, LinkProbe, UrlChecker};
use crate::progress::Progress;
use crate::validate::Validator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Tag used when a file cannot be read or decoded
pub const PARSE_FAILED: &str = "parse-failed";

/// Orchestrator for coordinating validation runs
pub struct Orchestrator {
    /// Effective settings (file + command line)
    config: Config,
    /// URL checker, when URL checking is enabled
    checker: Option<UrlChecker>,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Per-file reports
    pub summary: ValidationSummary,
    /// Errors that stopped a path from being processed at all
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if some input could not be found, read or decoded
    pub fn has_read_failures(&self) -> bool {
        !self.errors.is_empty()
            || self
                .summary
                .files
                .iter()
                .any(|f| f.report.has_tag(PARSE_FAILED))
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to detect metainfo files
    DetectionError(String),
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            OrchestratorError::DetectionError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create a new orchestrator; builds an HTTP probe when URL checking is on
    pub fn new(config: Config) -> Result<Self, OrchestratorError> {
        let probe: Option<Arc<dyn LinkProbe>> = if config.network.check_urls {
            let probe = HttpProbe::from_config(&config.network)
                .map_err(|e| OrchestratorError::HttpClientError(e.to_string()))?;
            Some(Arc::new(probe))
        } else {
            None
        };
        Ok(Self::with_probe(config, probe))
    }

    /// Create an orchestrator with a custom probe (for testing)
    pub fn with_probe(config: Config, probe: Option<Arc<dyn LinkProbe>>) -> Self {
        let concurrency = config.network.concurrency;
        Self {
            config,
            checker: probe.map(|p| UrlChecker::new(p, concurrency)),
        }
    }

    /// Run validation over the given paths with optional progress display
    pub async fn run(&self, paths: &[PathBuf], show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = ValidationSummary::new();
        let mut errors = Vec::new();
        let validator = Validator::new(&self.config.validation());

        // Step 1: Detect metainfo files
        let files = self.detect(paths, &mut errors);
        info!(count = files.len(), "detected metainfo files");

        for path in files {
            // Step 2: Parse
            progress.spinner(&format!("Validating {}", path.display()));
            let parsed = read_metainfo(&path);
            progress.finish_and_clear();

            let component = match parsed {
                Ok(component) => component,
                Err(e) => {
                    debug!(path = %path.display(), "parse failed: {}", e);
                    let mut report = ValidationReport::new();
                    report.push(Issue::error(PARSE_FAILED, e.to_string()));
                    summary.add_file(FileReport::new(path, None, report));
                    continue;
                }
            };

            // Step 3: Validate
            let mut report = validator.validate(&component);

            // Step 4: Probe URLs
            if let Some(ref checker) = self.checker {
                let urls = collect_urls(&component);
                progress.start(urls.len() as u64, "Checking URLs");
                let issues = checker.check(&urls, progress.bar()).await;
                progress.finish_and_clear();
                validator.extend(&mut report, issues);
            }

            summary.add_file(FileReport::new(path, component.id.clone(), report));
        }

        OrchestratorResult { summary, errors }
    }

    fn detect(&self, paths: &[PathBuf], errors: &mut Vec<OrchestratorError>) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for path in paths {
            match detect_metainfo(path) {
                Ok(found) if found.is_empty() => {
                    errors.push(nothing_found(path));
                }
                Ok(found) => {
                    for file in found {
                        if !files.contains(&file) {
                            files.push(file);
                        }
                    }
                }
                Err(e) => errors.push(OrchestratorError::DetectionError(e.to_string())),
            }
        }
        files
    }
}

fn nothing_found(path: &Path) -> OrchestratorError {
    OrchestratorError::DetectionError(crate::error::IoError::nothing_found(path).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<component type="desktop-application">
  <id>org.gpodder.gpodder</id>
  <metadata_license>CC0-1.0</metadata_license>
  <project_license>GPL-3.0-or-later</project_license>
  <name>gPodder</name>
  <summary>Media and podcast aggregator</summary>
  <description>
    <p>gPodder downloads and manages free audio and video content.</p>
  </description>
  <launchable type="desktop-id">org.gpodder.gpodder.desktop</launchable>
  <url type="homepage">https://gpodder.github.io/</url>
  <url type="bugtracker">https://github.com/gpodder/gpodder/issues</url>
  <content_rating type="oars-1.1"/>
  <releases>
    <release version="3.11.5" date="2024-12-17"/>
  </releases>
</component>
"#;

    struct RejectBugtracker;

    #[async_trait]
    impl LinkProbe for RejectBugtracker {
        async fn probe(&self, url: &str) -> Result<(), NetworkError> {
            if url.contains("issues") {
                Err(NetworkError::http_status(url, 404))
            } else {
                Ok(())
            }
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_run_valid_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "org.gpodder.gpodder.appdata.xml", VALID);

        let orchestrator = Orchestrator::with_probe(Config::default(), None);
        let result = orchestrator.run(&[dir.path().to_path_buf()], false).await;

        assert!(result.errors.is_empty());
        assert_eq!(result.summary.files_processed(), 1);
        assert!(result.summary.all_passed());
        assert_eq!(
            result.summary.files[0].id.as_deref(),
            Some("org.gpodder.gpodder")
        );
        assert!(!result.has_read_failures());
    }

    #[tokio::test]
    async fn test_run_parse_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.metainfo.xml", "<component><id>x</component>");

        let orchestrator = Orchestrator::with_probe(Config::default(), None);
        let result = orchestrator.run(&[dir.path().to_path_buf()], false).await;

        assert_eq!(result.summary.files_failed(), 1);
        assert!(result.summary.files[0].report.has_tag(PARSE_FAILED));
        assert!(result.has_read_failures());
    }

    #[tokio::test]
    async fn test_run_nothing_found() {
        let dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::with_probe(Config::default(), None);
        let result = orchestrator.run(&[dir.path().to_path_buf()], false).await;

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].to_string().contains("no metainfo files"));
        assert!(result.has_read_failures());
    }

    #[tokio::test]
    async fn test_run_missing_path() {
        let orchestrator = Orchestrator::with_probe(Config::default(), None);
        let result = orchestrator
            .run(&[PathBuf::from("/nonexistent/metainfo")], false)
            .await;
        assert!(matches!(
            result.errors[0],
            OrchestratorError::DetectionError(_)
        ));
    }

    #[tokio::test]
    async fn test_run_with_url_checks() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "org.gpodder.gpodder.appdata.xml", VALID);

        let orchestrator =
            Orchestrator::with_probe(Config::default(), Some(Arc::new(RejectBugtracker)));
        let result = orchestrator.run(&[file], false).await;

        let report = &result.summary.files[0].report;
        assert_eq!(report.with_tag("url-unreachable").count(), 1);
        assert!(report.passed());
    }

    #[tokio::test]
    async fn test_run_strict_with_url_checks() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "org.gpodder.gpodder.appdata.xml", VALID);

        let mut config = Config::default();
        config.strict = true;
        let orchestrator = Orchestrator::with_probe(config, Some(Arc::new(RejectBugtracker)));
        let result = orchestrator.run(&[file], false).await;

        assert!(!result.summary.all_passed());
    }

    #[tokio::test]
    async fn test_run_same_file_twice_is_checked_once() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "org.gpodder.gpodder.appdata.xml", VALID);

        let orchestrator = Orchestrator::with_probe(Config::default(), None);
        let result = orchestrator
            .run(&[dir.path().to_path_buf(), file], false)
            .await;
        assert_eq!(result.summary.files_processed(), 1);
    }
}
