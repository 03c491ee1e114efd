//! Metainfo file detection
//!
//! Features:
//! - Accepts a file path as-is
//! - Scans a directory and the usual source-tree locations
//!   (`data/`, `share/metainfo/`, `share/appdata/`)
//! - Recognises `.metainfo.xml`, `.appdata.xml` and their `.in` templates

use crate::error::IoError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name suffixes of metainfo files
pub const METAINFO_SUFFIXES: &[&str] = &[
    ".metainfo.xml",
    ".appdata.xml",
    ".metainfo.xml.in",
    ".appdata.xml.in",
];

/// Subdirectories searched below a project root
const SEARCH_DIRS: &[&str] = &["", "data", "share/metainfo", "share/appdata"];

/// Returns true if the file name looks like a metainfo file
pub fn is_metainfo_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| METAINFO_SUFFIXES.iter().any(|s| n.ends_with(s)))
        .unwrap_or(false)
}

/// Detect metainfo files for a path
///
/// A file is returned unchanged (whatever its name). A directory is
/// searched non-recursively in each of the standard locations. The
/// result is sorted and free of duplicates.
pub fn detect_metainfo(path: &Path) -> Result<Vec<PathBuf>, IoError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(IoError::path_not_found(path));
    }

    let mut found = Vec::new();
    for sub in SEARCH_DIRS {
        let dir = if sub.is_empty() {
            path.to_path_buf()
        } else {
            path.join(sub)
        };
        if !dir.is_dir() {
            continue;
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| IoError::generic(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| IoError::generic(&dir, e))?;
            let candidate = entry.path();
            if candidate.is_file() && is_metainfo_file(&candidate) {
                debug!(path = %candidate.display(), "found metainfo file");
                found.push(candidate);
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_metainfo_file() {
        assert!(is_metainfo_file(Path::new("org.gpodder.gpodder.appdata.xml")));
        assert!(is_metainfo_file(Path::new("a/b/org.x.Y.metainfo.xml")));
        assert!(is_metainfo_file(Path::new("org.x.Y.metainfo.xml.in")));
        assert!(!is_metainfo_file(Path::new("org.x.Y.desktop")));
        assert!(!is_metainfo_file(Path::new("metainfo.xml.bak")));
    }

    #[test]
    fn test_detect_file_is_returned_as_is() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("custom.xml");
        fs::write(&file, "<component/>").unwrap();
        assert_eq!(detect_metainfo(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_detect_standard_locations() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("share/metainfo")).unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("share/metainfo/b.metainfo.xml"), "").unwrap();
        fs::write(dir.path().join("data/a.appdata.xml.in"), "").unwrap();
        fs::write(dir.path().join("data/README.md"), "").unwrap();
        fs::write(dir.path().join("c.appdata.xml"), "").unwrap();

        let found = detect_metainfo(dir.path()).unwrap();
        assert_eq!(found.len(), 3);
        assert!(found.windows(2).all(|w| w[0] <= w[1]));
        assert!(found.iter().all(|p| is_metainfo_file(p)));
    }

    #[test]
    fn test_detect_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(detect_metainfo(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_detect_nonexistent_path() {
        let err = detect_metainfo(Path::new("/nonexistent/path")).unwrap_err();
        assert!(matches!(err, IoError::PathNotFound { .. }));
    }
}
