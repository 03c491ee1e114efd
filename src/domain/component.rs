//! The application record (`<component>` root of a metainfo file)

use super::{compare_versions, Description, Element, Issue, Release, Screenshot};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Component `type` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ComponentKind {
    DesktopApplication,
    ConsoleApplication,
    WebApplication,
    Addon,
    #[default]
    Generic,
    /// Any other value, kept verbatim
    Other(String),
}

impl ComponentKind {
    /// Parse the attribute value
    pub fn from_attr(value: &str) -> Self {
        match value {
            // "desktop" is the legacy spelling of desktop-application
            "desktop-application" | "desktop" => ComponentKind::DesktopApplication,
            "console-application" => ComponentKind::ConsoleApplication,
            "web-application" => ComponentKind::WebApplication,
            "addon" => ComponentKind::Addon,
            "generic" => ComponentKind::Generic,
            other => ComponentKind::Other(other.to_string()),
        }
    }

    /// The attribute value for this kind
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::DesktopApplication => "desktop-application",
            ComponentKind::ConsoleApplication => "console-application",
            ComponentKind::WebApplication => "web-application",
            ComponentKind::Addon => "addon",
            ComponentKind::Generic => "generic",
            ComponentKind::Other(s) => s,
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl From<String> for ComponentKind {
    fn from(value: String) -> Self {
        ComponentKind::from_attr(&value)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `<url type="...">` purpose
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum UrlKind {
    Homepage,
    Bugtracker,
    VcsBrowser,
    Help,
    Faq,
    Donation,
    Translate,
    Contact,
    Contribute,
    /// Unrecognised purpose, kept verbatim
    Other(String),
}

impl UrlKind {
    /// Parse the attribute value
    pub fn from_attr(value: &str) -> Self {
        match value {
            "homepage" => UrlKind::Homepage,
            "bugtracker" => UrlKind::Bugtracker,
            "vcs-browser" => UrlKind::VcsBrowser,
            "help" => UrlKind::Help,
            "faq" => UrlKind::Faq,
            "donation" => UrlKind::Donation,
            "translate" => UrlKind::Translate,
            "contact" => UrlKind::Contact,
            "contribute" => UrlKind::Contribute,
            other => UrlKind::Other(other.to_string()),
        }
    }

    /// The attribute value for this kind
    pub fn as_str(&self) -> &str {
        match self {
            UrlKind::Homepage => "homepage",
            UrlKind::Bugtracker => "bugtracker",
            UrlKind::VcsBrowser => "vcs-browser",
            UrlKind::Help => "help",
            UrlKind::Faq => "faq",
            UrlKind::Donation => "donation",
            UrlKind::Translate => "translate",
            UrlKind::Contact => "contact",
            UrlKind::Contribute => "contribute",
            UrlKind::Other(s) => s,
        }
    }

    /// Returns true for purposes defined by AppStream
    pub fn is_known(&self) -> bool {
        !matches!(self, UrlKind::Other(_))
    }
}

impl From<UrlKind> for String {
    fn from(kind: UrlKind) -> Self {
        kind.as_str().to_string()
    }
}

impl From<String> for UrlKind {
    fn from(value: String) -> Self {
        UrlKind::from_attr(&value)
    }
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    #[serde(rename = "type")]
    pub kind: UrlKind,
    pub value: String,
}

impl Url {
    pub fn new(kind: UrlKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// `<launchable>` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launchable {
    /// `type` attribute, usually `desktop-id`
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Launchable {
    /// Create a `desktop-id` launchable
    pub fn desktop_id(value: impl Into<String>) -> Self {
        Self {
            kind: "desktop-id".to_string(),
            value: value.into(),
        }
    }
}

/// Developer attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Written as the legacy `<developer_name>` element
    #[serde(skip)]
    pub legacy: bool,
}

/// One `<content_attribute>` of a content rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAttribute {
    pub id: String,
    pub value: String,
}

/// `<content_rating>` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRating {
    /// Rating scheme and version, e.g. `oars-1.1`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub attributes: Vec<ContentAttribute>,
}

/// `<provides>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provided {
    /// Child tag name (`binary`, `id`, `mediatype`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// An application record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub id: Option<String>,
    pub metadata_license: Option<String>,
    pub project_license: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<Description>,
    pub launchable: Option<Launchable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<Developer>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub urls: Vec<Url>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub screenshots: Vec<Screenshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<ContentRating>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub releases: Vec<Release>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub provides: Vec<Provided>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_contact: Option<String>,
    /// Unrecognised child elements, kept verbatim
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extra: Vec<Element>,
    /// Schema problems found while decoding (invalid markup or attribute values)
    #[serde(skip)]
    pub schema_issues: Vec<Issue>,
}

/// Error returned by [`Component::add_release`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddReleaseError {
    /// A release with this version already exists
    Duplicate(String),
    /// The version string is not valid
    InvalidVersion(String),
}

impl fmt::Display for AddReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddReleaseError::Duplicate(v) => write!(f, "release {} already exists", v),
            AddReleaseError::InvalidVersion(v) => write!(f, "invalid release version '{}'", v),
        }
    }
}

impl std::error::Error for AddReleaseError {}

impl Component {
    /// Create an empty desktop-application record
    pub fn desktop_application() -> Self {
        Self {
            kind: ComponentKind::DesktopApplication,
            ..Default::default()
        }
    }

    /// Display name, or the id, or a placeholder
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("(unnamed)")
    }

    /// The release with the highest version; the first one wins on a tie
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.iter().reduce(|best, r| {
            if compare_versions(&r.version, &best.version) == Ordering::Greater {
                r
            } else {
                best
            }
        })
    }

    /// The release with exactly this version string
    pub fn release(&self, version: &str) -> Option<&Release> {
        let version = version.trim();
        self.releases.iter().find(|r| r.version.trim() == version)
    }

    /// First URL of the given purpose
    pub fn url(&self, kind: &UrlKind) -> Option<&str> {
        self.urls
            .iter()
            .find(|u| &u.kind == kind)
            .map(|u| u.value.as_str())
    }

    /// The screenshot marked `default`, or the first one
    pub fn default_screenshot(&self) -> Option<&Screenshot> {
        self.screenshots
            .iter()
            .find(|s| s.kind == super::ScreenshotKind::Default)
            .or_else(|| self.screenshots.first())
    }

    /// Returns true if releases are in non-increasing version order
    pub fn releases_sorted(&self) -> bool {
        self.releases
            .windows(2)
            .all(|w| w[0].cmp_version(&w[1]) != Ordering::Less)
    }

    /// Insert a release keeping descending version order
    pub fn add_release(&mut self, release: Release) -> Result<(), AddReleaseError> {
        if release.parsed_version().is_none() {
            return Err(AddReleaseError::InvalidVersion(release.version));
        }
        if self.release(&release.version).is_some() {
            return Err(AddReleaseError::Duplicate(release.version));
        }

        let position = self
            .releases
            .iter()
            .position(|r| release.cmp_version(r) == Ordering::Greater)
            .unwrap_or(self.releases.len());
        self.releases.insert(position, release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Block, ScreenshotKind};

    fn sample() -> Component {
        let mut c = Component::desktop_application();
        c.id = Some("org.gpodder.gpodder".to_string());
        c.name = Some("gPodder".to_string());
        c.releases = vec![
            Release::new("3.11.5").with_date("2024-12-17"),
            Release::new("3.11.4")
                .with_date("2023-10-11")
                .with_description(Description::new(vec![Block::paragraph(
                    "This release only updates dependencies.",
                )])),
            Release::new("3.11.3").with_date("2023-09-30"),
        ];
        c
    }

    #[test]
    fn test_latest_release() {
        let c = sample();
        assert_eq!(c.latest_release().unwrap().version, "3.11.5");
    }

    #[test]
    fn test_latest_release_unsorted_input() {
        let mut c = sample();
        c.releases.reverse();
        assert_eq!(c.latest_release().unwrap().version, "3.11.5");
    }

    #[test]
    fn test_latest_release_empty() {
        assert!(Component::default().latest_release().is_none());
    }

    #[test]
    fn test_release_lookup() {
        let c = sample();
        let release = c.release("3.11.4").unwrap();
        assert_eq!(
            release.notes_text(),
            "This release only updates dependencies."
        );
        assert!(c.release("9.9.9").is_none());
    }

    #[test]
    fn test_releases_sorted() {
        let mut c = sample();
        assert!(c.releases_sorted());
        c.releases.swap(0, 1);
        assert!(!c.releases_sorted());
    }

    #[test]
    fn test_add_release_at_top() {
        let mut c = sample();
        c.add_release(Release::new("3.11.6")).unwrap();
        assert_eq!(c.releases[0].version, "3.11.6");
        assert!(c.releases_sorted());
    }

    #[test]
    fn test_add_release_in_middle() {
        let mut c = sample();
        c.add_release(Release::new("3.11.4.1")).unwrap();
        assert_eq!(c.releases[1].version, "3.11.4.1");
        assert!(c.releases_sorted());
    }

    #[test]
    fn test_add_release_duplicate() {
        let mut c = sample();
        let err = c.add_release(Release::new("3.11.4")).unwrap_err();
        assert_eq!(err, AddReleaseError::Duplicate("3.11.4".to_string()));
    }

    #[test]
    fn test_add_release_invalid_version() {
        let mut c = sample();
        assert!(matches!(
            c.add_release(Release::new("")),
            Err(AddReleaseError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_component_kind_attr() {
        assert_eq!(
            ComponentKind::from_attr("desktop"),
            ComponentKind::DesktopApplication
        );
        assert_eq!(
            ComponentKind::from_attr("font"),
            ComponentKind::Other("font".to_string())
        );
        assert_eq!(ComponentKind::Other("font".into()).as_str(), "font");
    }

    #[test]
    fn test_url_kind_attr() {
        assert_eq!(UrlKind::from_attr("vcs-browser"), UrlKind::VcsBrowser);
        assert!(UrlKind::Homepage.is_known());
        assert!(!UrlKind::from_attr("blog").is_known());
    }

    #[test]
    fn test_url_lookup() {
        let mut c = sample();
        c.urls.push(Url::new(UrlKind::Homepage, "https://gpodder.github.io/"));
        assert_eq!(c.url(&UrlKind::Homepage), Some("https://gpodder.github.io/"));
        assert_eq!(c.url(&UrlKind::Bugtracker), None);
    }

    #[test]
    fn test_default_screenshot() {
        let mut c = sample();
        assert!(c.default_screenshot().is_none());
        c.screenshots
            .push(Screenshot::new(ScreenshotKind::Extra, "b", "https://x/b.png"));
        c.screenshots
            .push(Screenshot::new(ScreenshotKind::Default, "a", "https://x/a.png"));
        assert_eq!(
            c.default_screenshot().unwrap().caption.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_kinds_serialize_as_strings() {
        let url = Url::new(UrlKind::VcsBrowser, "https://github.com/gpodder/gpodder");
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(
            json,
            r#"{"type":"vcs-browser","value":"https://github.com/gpodder/gpodder"}"#
        );
        let kind: ComponentKind = serde_json::from_str("\"desktop-application\"").unwrap();
        assert_eq!(kind, ComponentKind::DesktopApplication);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut c = Component::default();
        assert_eq!(c.display_name(), "(unnamed)");
        c.id = Some("org.example.App".to_string());
        assert_eq!(c.display_name(), "org.example.App");
    }
}
