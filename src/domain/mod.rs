//! Core domain models for appmeta
//!
//! This module contains the fundamental types used throughout the application:
//! - The application record and its typed parts (URLs, launchable, rating)
//! - Release records and release version ordering
//! - Screenshot records
//! - Description markup
//! - Validation report structures

mod component;
mod description;
mod element;
mod release;
mod report;
mod screenshot;
mod version;

pub use component::{
    AddReleaseError, Component, ComponentKind, ContentAttribute, ContentRating, Developer,
    Launchable, Provided, Url, UrlKind,
};
pub use description::{inlines_text, Block, Description, Inline};
pub use element::{Element, Node};
pub use release::{parse_release_date, Release, ReleaseKind, Urgency};
pub use report::{FileReport, Issue, Severity, ValidationReport, ValidationSummary};
pub use screenshot::{Image, ImageKind, Screenshot, ScreenshotKind};
pub use version::{compare_versions, ReleaseVersion, VersionComponent, VersionParseError};
