//! Release version strings
//!
//! AppStream release versions are dot-separated components such as
//! `3.11.5` or `1.0.beta2`. Comparison is component-wise:
//! - numeric components compare numerically
//! - alphabetic components compare lexically
//! - a numeric component is newer than an alphabetic one in the same slot
//! - a missing trailing component counts as `0`

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A single component of a release version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionComponent {
    /// Purely numeric component (e.g., `11`)
    Numeric(u64),
    /// Anything else (e.g., `rc1`, `beta`)
    Text(String),
}

impl VersionComponent {
    fn parse(part: &str) -> Self {
        match part.parse::<u64>() {
            Ok(n) => VersionComponent::Numeric(n),
            Err(_) => VersionComponent::Text(part.to_string()),
        }
    }
}

impl Ord for VersionComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionComponent::Numeric(a), VersionComponent::Numeric(b)) => a.cmp(b),
            (VersionComponent::Text(a), VersionComponent::Text(b)) => a.cmp(b),
            (VersionComponent::Numeric(_), VersionComponent::Text(_)) => Ordering::Greater,
            (VersionComponent::Text(_), VersionComponent::Numeric(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for VersionComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionComponent::Numeric(n) => write!(f, "{}", n),
            VersionComponent::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Error returned when a version string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError {
    /// The offending input
    pub input: String,
    /// Why it was rejected
    pub message: &'static str,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for VersionParseError {}

/// A parsed release version with its original string representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseVersion {
    /// The version string exactly as written in the metainfo file
    pub raw: String,
    /// Parsed components
    pub components: Vec<VersionComponent>,
}

impl ReleaseVersion {
    /// Parse a version string
    pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError {
                input: raw.to_string(),
                message: "empty version",
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(VersionParseError {
                input: raw.to_string(),
                message: "whitespace inside version",
            });
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(VersionParseError {
                    input: raw.to_string(),
                    message: "empty component",
                });
            }
            components.push(VersionComponent::parse(part));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            components,
        })
    }

    /// Number of components (e.g., 3 for `3.11.5`)
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false: a parsed version has at least one component
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns true if every component is numeric
    pub fn is_numeric(&self) -> bool {
        self.components
            .iter()
            .all(|c| matches!(c, VersionComponent::Numeric(_)))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let zero = VersionComponent::Numeric(0);
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).unwrap_or(&zero);
            let b = other.components.get(i).unwrap_or(&zero);
            match a.cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReleaseVersion {}

impl FromStr for ReleaseVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Compare two raw version strings, treating unparseable ones as oldest
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (ReleaseVersion::parse(a), ReleaseVersion::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ReleaseVersion {
        ReleaseVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_numeric() {
        let version = v("3.11.5");
        assert_eq!(version.len(), 3);
        assert!(version.is_numeric());
        assert_eq!(
            version.components,
            vec![
                VersionComponent::Numeric(3),
                VersionComponent::Numeric(11),
                VersionComponent::Numeric(5)
            ]
        );
    }

    #[test]
    fn test_parse_mixed() {
        let version = v("1.0.beta2");
        assert!(!version.is_numeric());
        assert_eq!(
            version.components[2],
            VersionComponent::Text("beta2".to_string())
        );
    }

    #[test]
    fn test_parse_trims_outer_whitespace() {
        assert_eq!(v(" 3.11.4\n").raw, "3.11.4");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ReleaseVersion::parse("").is_err());
        assert!(ReleaseVersion::parse("   ").is_err());
        assert!(ReleaseVersion::parse("3..1").is_err());
        assert!(ReleaseVersion::parse("3.").is_err());
        assert!(ReleaseVersion::parse("3 .1").is_err());
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("3.11.5") > v("3.11.4"));
        assert!(v("3.11.0") > v("3.10.9"));
        assert!(v("3.10.0") > v("3.9.21"));
        assert!(v("10.0") > v("9.99.99"));
    }

    #[test]
    fn test_missing_component_counts_as_zero() {
        assert_eq!(v("3.11"), v("3.11.0"));
        assert!(v("3.11.1") > v("3.11"));
    }

    #[test]
    fn test_numeric_beats_text_in_same_slot() {
        assert!(v("1.0.0") > v("1.0.rc1"));
        assert!(v("1.0.rc2") > v("1.0.rc1"));
    }

    #[test]
    fn test_compare_versions_unparseable_is_oldest() {
        assert_eq!(compare_versions("1.0", ""), Ordering::Greater);
        assert_eq!(compare_versions("", "1.0"), Ordering::Less);
        assert_eq!(compare_versions("2.0", "2.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_display_keeps_raw() {
        assert_eq!(format!("{}", v("3.11")), "3.11");
    }

    #[test]
    fn test_from_str() {
        let version: ReleaseVersion = "2.0".parse().unwrap();
        assert_eq!(version.raw, "2.0");
    }

    #[test]
    fn test_parse_error_message() {
        let err = ReleaseVersion::parse("3..1").unwrap_err();
        assert!(err.to_string().contains("empty component"));
    }
}
