//! Rule checks for application records
//!
//! This module provides:
//! - Validation options (strict mode, ignored tags)
//! - The rule engine that turns a record into a list of tagged issues

mod config;

pub use config::ValidationConfig;

use crate::domain::{
    Component, ComponentKind, Description, Issue, Severity, ValidationReport,
};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Reverse-DNS identifier: at least three dot-separated segments
static REVERSE_DNS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+){2,}$").unwrap());

/// Licenses accepted for the metadata itself
pub const PERMISSIVE_METADATA_LICENSES: &[&str] = &[
    "CC0-1.0",
    "CC-BY-3.0",
    "CC-BY-4.0",
    "CC-BY-SA-3.0",
    "CC-BY-SA-4.0",
    "GFDL-1.3",
    "MIT",
    "FSFAP",
    "0BSD",
];

/// Rule engine that checks a record and reports issues
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new Validator with the given options
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Check a record against every rule
    pub fn validate(&self, component: &Component) -> ValidationReport {
        let mut issues = component.schema_issues.clone();

        check_required(component, &mut issues);
        check_kind(component, &mut issues);
        check_id(component, &mut issues);
        check_metadata_license(component, &mut issues);
        if let Some(ref description) = component.description {
            check_description(description, "description", &mut issues);
        }
        check_releases(component, &mut issues);
        check_screenshots(component, &mut issues);
        check_urls(component, &mut issues);

        if component.content_rating.is_none() {
            issues.push(Issue::warning(
                "content-rating-missing",
                "no <content_rating> element",
            ));
        }

        for element in &component.extra {
            issues.push(Issue::info(
                "unknown-tag",
                format!("unrecognised element <{}> kept as-is", element.name),
            ));
        }

        let mut report = ValidationReport::new();
        self.extend(&mut report, issues);
        debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validated {}",
            component.display_name()
        );
        report
    }

    /// Apply ignore and strict settings to a single issue
    pub fn review(&self, mut issue: Issue) -> Option<Issue> {
        if !self.config.should_report(&issue.tag) {
            return None;
        }
        if self.config.strict && issue.severity == Severity::Warning {
            issue.severity = Severity::Error;
        }
        Some(issue)
    }

    /// Add issues to a report, after review
    pub fn extend(&self, report: &mut ValidationReport, issues: Vec<Issue>) {
        for issue in issues {
            if let Some(issue) = self.review(issue) {
                report.push(issue);
            }
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn check_required(component: &Component, issues: &mut Vec<Issue>) {
    let fields = [
        ("id", is_blank(component.id.as_deref())),
        ("metadata_license", is_blank(component.metadata_license.as_deref())),
        ("project_license", is_blank(component.project_license.as_deref())),
        ("name", is_blank(component.name.as_deref())),
        ("summary", is_blank(component.summary.as_deref())),
        ("description", component.description.is_none()),
        (
            "launchable",
            is_blank(component.launchable.as_ref().map(|l| l.value.as_str())),
        ),
    ];

    for (field, missing) in fields {
        if missing {
            issues.push(Issue::error(
                "missing-field",
                format!("required element <{}> is missing or empty", field),
            ));
        }
    }
}

fn check_kind(component: &Component, issues: &mut Vec<Issue>) {
    match component.kind {
        ComponentKind::DesktopApplication => {}
        ComponentKind::Other(ref other) => issues.push(Issue::error(
            "component-type-unexpected",
            format!("unknown component type '{}'", other),
        )),
        ref known => issues.push(Issue::warning(
            "component-type-unexpected",
            format!("component type is '{}', expected desktop-application", known),
        )),
    }
}

fn check_id(component: &Component, issues: &mut Vec<Issue>) {
    let Some(id) = component.id.as_deref().map(str::trim) else {
        return;
    };
    if !id.is_empty() && !REVERSE_DNS_RE.is_match(id) {
        issues.push(Issue::warning(
            "id-not-reverse-dns",
            format!("id '{}' is not a reverse-DNS name", id),
        ));
    }
}

/// Returns true if every license in an SPDX expression is permissive
fn is_permissive_expression(expression: &str) -> bool {
    let mut licenses = expression
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|t| !t.is_empty() && *t != "AND" && *t != "OR")
        .peekable();
    licenses.peek().is_some() && licenses.all(|l| PERMISSIVE_METADATA_LICENSES.contains(&l))
}

fn check_metadata_license(component: &Component, issues: &mut Vec<Issue>) {
    let Some(license) = component.metadata_license.as_deref().map(str::trim) else {
        return;
    };
    if !license.is_empty() && !is_permissive_expression(license) {
        issues.push(Issue::warning(
            "metadata-license-not-permissive",
            format!("metadata license '{}' is not a permissive license", license),
        ));
    }
}

fn check_description(description: &Description, context: &str, issues: &mut Vec<Issue>) {
    if description.is_empty() {
        issues.push(Issue::error(
            "description-empty",
            format!("{} has no paragraphs or lists", context),
        ));
        return;
    }
    if description
        .blocks
        .iter()
        .any(|b| b.is_empty() || b.has_empty_item())
    {
        issues.push(Issue::error(
            "description-empty",
            format!("{} contains an empty paragraph or list item", context),
        ));
    }
}

fn check_releases(component: &Component, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();

    for release in &component.releases {
        let version = release.version.trim();
        if version.is_empty() {
            issues.push(Issue::error(
                "release-version-empty",
                "a <release> has an empty version",
            ));
            continue;
        }
        if release.parsed_version().is_none() {
            issues.push(Issue::error(
                "release-version-invalid",
                format!("release version '{}' is not dot-separated components", version),
            ));
        }
        if !seen.insert(version) {
            issues.push(Issue::error(
                "release-version-duplicate",
                format!("release {} is listed more than once", version),
            ));
        }

        if release.date.is_none() && release.timestamp.is_none() {
            issues.push(Issue::warning(
                "release-date-missing",
                format!("release {} has no date", version),
            ));
        } else if release.has_invalid_date() {
            issues.push(Issue::warning(
                "release-date-invalid",
                format!(
                    "release {} has an invalid date '{}'",
                    version,
                    release.date.as_deref().unwrap_or_default()
                ),
            ));
        }

        if let Some(ref description) = release.description {
            check_description(description, &format!("release {}", version), issues);
        }
    }

    // Order is checked between consecutive parseable versions
    let ordered: Vec<_> = component
        .releases
        .iter()
        .filter(|r| r.parsed_version().is_some())
        .collect();
    for pair in ordered.windows(2) {
        let (newer, older) = (pair[0], pair[1]);
        match newer.cmp_version(older) {
            Ordering::Less => issues.push(Issue::error(
                "releases-not-sorted",
                format!(
                    "release {} is listed before the higher version {}",
                    newer.version, older.version
                ),
            )),
            Ordering::Greater => {
                if let (Some(newer_date), Some(older_date)) = (newer.date(), older.date()) {
                    if newer_date < older_date {
                        issues.push(Issue::warning(
                            "releases-date-order",
                            format!(
                                "release {} ({}) is dated before release {} ({})",
                                newer.version, newer_date, older.version, older_date
                            ),
                        ));
                    }
                }
            }
            Ordering::Equal => {}
        }
    }
}

fn check_screenshots(component: &Component, issues: &mut Vec<Issue>) {
    for (index, screenshot) in component.screenshots.iter().enumerate() {
        let number = index + 1;
        if !screenshot.has_caption() {
            issues.push(Issue::error(
                "screenshot-caption-missing",
                format!("screenshot {} has no caption", number),
            ));
        }
        match screenshot.image_url() {
            None => issues.push(Issue::error(
                "screenshot-image-missing",
                format!("screenshot {} has no image", number),
            )),
            Some(url) if !is_http(url) => issues.push(Issue::warning(
                "url-not-http",
                format!("screenshot {} image '{}' is not an http(s) URL", number, url),
            )),
            Some(_) => {}
        }
    }
}

fn is_http(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("https://") || url.starts_with("http://")
}

fn check_urls(component: &Component, issues: &mut Vec<Issue>) {
    for url in &component.urls {
        if !is_http(&url.value) {
            issues.push(Issue::warning(
                "url-not-http",
                format!("{} URL '{}' is not an http(s) URL", url.kind, url.value),
            ));
        }
        if !url.kind.is_known() {
            issues.push(Issue::warning(
                "url-kind-unknown",
                format!("unknown URL type '{}'", url.kind),
            ));
        }
    }
}
