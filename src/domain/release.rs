//! Release records (`<release>` entries of a metainfo file)

use super::{compare_versions, Description, ReleaseVersion};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Release `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    /// Stable release (the default when the attribute is absent)
    Stable,
    /// Development/pre-release
    Development,
    /// Snapshot build
    Snapshot,
}

impl ReleaseKind {
    /// Parse the attribute value
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "stable" => Some(ReleaseKind::Stable),
            "development" => Some(ReleaseKind::Development),
            "snapshot" => Some(ReleaseKind::Snapshot),
            _ => None,
        }
    }

    /// The attribute value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Stable => "stable",
            ReleaseKind::Development => "development",
            ReleaseKind::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Release `urgency` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Parse the attribute value
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Urgency::Low),
            "medium" => Some(Urgency::Medium),
            "high" => Some(Urgency::High),
            "critical" => Some(Urgency::Critical),
            _ => None,
        }
    }

    /// The attribute value for this urgency
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

/// A single release entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version string as written
    pub version: String,
    /// `date` attribute as written (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `timestamp` attribute (seconds since the Unix epoch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// `type` attribute
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReleaseKind>,
    /// `urgency` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    /// Release notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    /// `<url type="details">`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Release {
    /// Create a new release with just a version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: None,
            timestamp: None,
            kind: None,
            urgency: None,
            description: None,
            url: None,
        }
    }

    /// Set the release date (raw ISO 8601 text)
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the release kind
    pub fn with_kind(mut self, kind: ReleaseKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the release notes
    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    /// Parsed version, if valid
    pub fn parsed_version(&self) -> Option<ReleaseVersion> {
        ReleaseVersion::parse(&self.version).ok()
    }

    /// Compare two releases by version
    pub fn cmp_version(&self, other: &Release) -> Ordering {
        compare_versions(&self.version, &other.version)
    }

    /// Release date, from `date` or else `timestamp`
    ///
    /// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        if let Some(ref raw) = self.date {
            return parse_release_date(raw);
        }
        self.timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.date_naive())
    }

    /// Returns true if a `date` attribute is present but unparseable
    pub fn has_invalid_date(&self) -> bool {
        self.date
            .as_deref()
            .is_some_and(|raw| parse_release_date(raw).is_none())
    }

    /// Plain-text release notes (empty when there is no description)
    pub fn notes_text(&self) -> String {
        self.description
            .as_ref()
            .map(|d| d.to_plain_text())
            .unwrap_or_default()
    }

    /// Effective release kind (`stable` when unspecified)
    pub fn effective_kind(&self) -> ReleaseKind {
        self.kind.unwrap_or(ReleaseKind::Stable)
    }
}

/// Parse an AppStream release date
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}
