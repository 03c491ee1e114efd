//! Application error types using thiserror
//!
//! Error hierarchy:
//! - MetainfoError: Issues with reading, decoding or writing metainfo files
//! - NetworkError: Issues with probing URLs
//! - ConfigError: Issues with CLI or config-file configuration
//! - IoError: File system operation failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Metainfo file related errors
    #[error(transparent)]
    Metainfo(#[from] MetainfoError),

    /// URL probing related errors
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to metainfo file operations
#[derive(Error, Debug)]
pub enum MetainfoError {
    /// Metainfo file not found
    #[error("metainfo file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read metainfo file
    #[error("failed to read metainfo file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write metainfo file
    #[error("failed to write metainfo file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed XML
    #[error("malformed XML at byte {position}: {message}")]
    XmlParseError { position: u64, message: String },

    /// Root element is not `<component>`
    #[error("unexpected root element <{name}>, expected <component>")]
    UnexpectedRoot { name: String },

    /// Invalid value in a typed field
    #[error("invalid value '{value}' for {field}: {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Release version already present
    #[error("release {version} already exists")]
    DuplicateRelease { version: String },

    /// Release to add is not newer than the latest release
    #[error("release {version} is not newer than the latest release {latest}")]
    ReleaseNotNewer { version: String, latest: String },

    /// Release lookup failed
    #[error("no release with version {version}")]
    ReleaseNotFound { version: String },

    /// Decoding failed inside a specific file
    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<MetainfoError>,
    },
}

/// Errors related to URL probing
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Failed to create the HTTP client
    #[error("failed to create HTTP client: {message}")]
    ClientError { message: String },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Request failed before a response arrived
    #[error("failed to fetch {url}: {message}")]
    RequestFailed { url: String, message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {url}")]
    RateLimitExceeded { url: String },

    /// Timeout
    #[error("timeout while fetching {url}")]
    Timeout { url: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has wrong types
    #[error("invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Invalid value for an option
    #[error("invalid value '{value}' for {option}: {message}")]
    InvalidValue {
        option: String,
        value: String,
        message: String,
    },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Path not found
    #[error("path not found: {path}")]
    PathNotFound { path: PathBuf },

    /// No metainfo file found under a directory
    #[error("no metainfo files found in {path}")]
    NothingFound { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetainfoError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        MetainfoError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetainfoError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetainfoError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(position: u64, message: impl Into<String>) -> Self {
        MetainfoError::XmlParseError {
            position,
            message: message.into(),
        }
    }

    /// Creates a new InvalidValue error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        MetainfoError::InvalidValue {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Attach the file path to a decoding error
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // These already name their file
            e @ (MetainfoError::NotFound { .. }
            | MetainfoError::ReadError { .. }
            | MetainfoError::WriteError { .. }
            | MetainfoError::InFile { .. }) => e,
            e => MetainfoError::InFile {
                path: path.into(),
                source: Box::new(e),
            },
        }
    }
}

impl NetworkError {
    /// Creates a new HttpStatus error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        NetworkError::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a new RequestFailed error
    pub fn request_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        NetworkError::RequestFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        NetworkError::Timeout { url: url.into() }
    }

    /// Returns true if retrying may help
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::RateLimitExceeded { .. }
            | NetworkError::Timeout { .. }
            | NetworkError::RequestFailed { .. } => true,
            NetworkError::HttpStatus { status, .. } => *status >= 500,
            NetworkError::ClientError { .. } => false,
        }
    }
}

impl ConfigError {
    /// Creates a new ParseError
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidValue error
    pub fn invalid_value(
        option: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            option: option.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new PathNotFound error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::PathNotFound { path: path.into() }
    }

    /// Creates a new NothingFound error
    pub fn nothing_found(path: impl Into<PathBuf>) -> Self {
        IoError::NothingFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metainfo_error_not_found() {
        let err = MetainfoError::not_found("/path/to/app.metainfo.xml");
        let msg = format!("{}", err);
        assert!(msg.contains("metainfo file not found"));
        assert!(msg.contains("app.metainfo.xml"));
    }

    #[test]
    fn test_metainfo_error_xml_parse() {
        let err = MetainfoError::xml_parse_error(42, "mismatched end tag");
        let msg = format!("{}", err);
        assert!(msg.contains("malformed XML at byte 42"));
        assert!(msg.contains("mismatched end tag"));
    }

    #[test]
    fn test_metainfo_error_unexpected_root() {
        let err = MetainfoError::UnexpectedRoot {
            name: "application".to_string(),
        };
        assert!(err.to_string().contains("<application>"));
    }

    #[test]
    fn test_metainfo_error_invalid_value() {
        let err = MetainfoError::invalid_value("release version", "3..1", "empty component");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid value '3..1'"));
        assert!(msg.contains("release version"));
    }

    #[test]
    fn test_metainfo_error_release_not_newer() {
        let err = MetainfoError::ReleaseNotNewer {
            version: "3.11.4".to_string(),
            latest: "3.11.5".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("3.11.4 is not newer"));
        assert!(msg.contains("3.11.5"));
    }

    #[test]
    fn test_metainfo_error_in_file() {
        let err = MetainfoError::xml_parse_error(1, "bad").in_file("a.metainfo.xml");
        let msg = format!("{}", err);
        assert!(msg.starts_with("a.metainfo.xml: "));
        assert!(msg.contains("malformed XML"));
    }

    #[test]
    fn test_metainfo_error_in_file_keeps_path_errors() {
        let err = MetainfoError::not_found("x.xml").in_file("y.xml");
        assert!(matches!(err, MetainfoError::NotFound { .. }));
    }

    #[test]
    fn test_network_error_status() {
        let err = NetworkError::http_status("https://example.org/a.png", 404);
        let msg = format!("{}", err);
        assert!(msg.contains("HTTP 404"));
        assert!(!err.is_transient());
        assert!(NetworkError::http_status("u", 503).is_transient());
    }

    #[test]
    fn test_network_error_timeout() {
        let err = NetworkError::timeout("https://example.org");
        assert!(err.to_string().contains("timeout"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_config_error_parse() {
        let err = ConfigError::parse_error("appmeta.toml", "expected a boolean");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid config file appmeta.toml"));
        assert!(msg.contains("expected a boolean"));
    }

    #[test]
    fn test_io_error_path_not_found() {
        let err = IoError::path_not_found("/path/to/missing");
        assert!(err.to_string().contains("path not found"));
    }

    #[test]
    fn test_io_error_nothing_found() {
        let err = IoError::nothing_found("/srv/empty");
        assert!(err.to_string().contains("no metainfo files found"));
    }

    #[test]
    fn test_app_error_from_metainfo_error() {
        let app_err: AppError = MetainfoError::not_found("/path").into();
        assert!(app_err.to_string().contains("metainfo file not found"));
    }

    #[test]
    fn test_app_error_from_network_error() {
        let app_err: AppError = NetworkError::timeout("https://x").into();
        assert!(app_err.to_string().contains("timeout"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::invalid_value("concurrency", "0", "must be > 0").into();
        assert!(app_err.to_string().contains("concurrency"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let app_err: AppError = IoError::path_not_found("/missing").into();
        assert!(app_err.to_string().contains("path not found"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = MetainfoError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
