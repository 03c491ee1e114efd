//! Screenshot records

use serde::{Deserialize, Serialize};

/// Screenshot `type` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotKind {
    /// The primary screenshot
    Default,
    /// Any additional screenshot
    #[default]
    Extra,
}

impl ScreenshotKind {
    /// Parse the attribute value, defaulting to `Extra`
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("default") => ScreenshotKind::Default,
            _ => ScreenshotKind::Extra,
        }
    }

    /// The attribute value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenshotKind::Default => "default",
            ScreenshotKind::Extra => "extra",
        }
    }
}

/// Image `type` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[default]
    Source,
    Thumbnail,
}

impl ImageKind {
    /// Parse the attribute value, defaulting to `Source`
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("thumbnail") => ImageKind::Thumbnail,
            _ => ImageKind::Source,
        }
    }

    /// The attribute value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Source => "source",
            ImageKind::Thumbnail => "thumbnail",
        }
    }
}

/// A screenshot image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "type")]
    pub kind: ImageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub url: String,
    /// Whether the `type` attribute was written out explicitly
    #[serde(skip)]
    pub explicit_kind: bool,
}

impl Image {
    /// Create a source image
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            kind: ImageKind::Source,
            width: None,
            height: None,
            url: url.into(),
            explicit_kind: false,
        }
    }
}

/// A `<screenshot>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    #[serde(rename = "type")]
    pub kind: ScreenshotKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub images: Vec<Image>,
}

impl Screenshot {
    /// Create a screenshot with a caption and a single source image
    pub fn new(kind: ScreenshotKind, caption: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind,
            caption: Some(caption.into()),
            images: vec![Image::new(url)],
        }
    }

    /// URL of the source image, falling back to the first image
    pub fn image_url(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|i| i.kind == ImageKind::Source)
            .or_else(|| self.images.first())
            .map(|i| i.url.as_str())
            .filter(|u| !u.trim().is_empty())
    }

    /// Returns true if the caption is present and non-blank
    pub fn has_caption(&self) -> bool {
        self.caption
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}
