//! Metainfo file detection, decoding and writing
//!
//! This module provides functionality to:
//! - Detect metainfo files in a directory
//! - Decode XML text into an application record
//! - Render a record back to XML, or insert a release into existing text

mod detector;
mod reader;
mod tree;
mod writer;

pub use detector::{detect_metainfo, is_metainfo_file, METAINFO_SUFFIXES};
pub use reader::{decode_component, decode_description, normalize_inlines, parse_metainfo};
pub use tree::{parse_tree, strip_layout_whitespace};
pub use writer::{
    encode_component, encode_description, encode_release, insert_release, render_element,
    to_xml, MetainfoWriter, WriteResult,
};

use crate::domain::Component;
use crate::error::MetainfoError;
use std::path::Path;

/// Read and decode a metainfo file
pub fn read_metainfo(path: &Path) -> Result<Component, MetainfoError> {
    if !path.exists() {
        return Err(MetainfoError::not_found(path));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| MetainfoError::read_error(path, e))?;
    parse_metainfo(&content).map_err(|e| e.in_file(path))
}

/// Render a record and write it to a file
pub fn write_metainfo(path: &Path, component: &Component) -> Result<(), MetainfoError> {
    std::fs::write(path, to_xml(component)).map_err(|e| MetainfoError::write_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_metainfo_not_found() {
        let err = read_metainfo(Path::new("/nonexistent/a.metainfo.xml")).unwrap_err();
        assert!(matches!(err, MetainfoError::NotFound { .. }));
    }

    #[test]
    fn test_read_metainfo_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.metainfo.xml");
        std::fs::write(&path, "<component><id>x</component>").unwrap();
        let err = read_metainfo(&path).unwrap_err();
        assert!(err.to_string().contains("broken.metainfo.xml"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.metainfo.xml");
        let mut component = Component::desktop_application();
        component.id = Some("org.example.App".to_string());
        write_metainfo(&path, &component).unwrap();
        assert_eq!(read_metainfo(&path).unwrap(), component);
    }
}
