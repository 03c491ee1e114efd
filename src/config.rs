//! Configuration file loading
//!
//! Settings come from an optional `appmeta.toml`, either passed with
//! `--config` or found in the working directory. Command-line flags are
//! applied on top by the caller.

use crate::error::ConfigError;
use crate::validate::ValidationConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up when no `--config` is given
pub const CONFIG_FILE: &str = "appmeta.toml";

/// Default timeout for URL probes, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default number of concurrent URL probes
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Network settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Probe every URL during validation
    pub check_urls: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum concurrent probes
    pub concurrency: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            check_urls: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Promote warnings to errors
    pub strict: bool,
    /// Issue tags to drop
    pub ignore: Vec<String>,
    pub network: NetworkConfig,
}

impl Config {
    /// Parse configuration text; `path` is only used in error messages
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::parse_error(path, e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "loaded config");
        Self::from_toml(&content, path)
    }

    /// Load `appmeta.toml` from a directory, or defaults when absent
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicit file when given, otherwise discover one in `dir`
    pub fn resolve(explicit: Option<&PathBuf>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::discover(dir),
        }
    }

    /// Validation options derived from this configuration
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig::new()
            .with_strict(self.strict)
            .with_ignore(self.ignore.clone())
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.network.concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "network.concurrency",
                "0",
                "must be at least 1",
            ));
        }
        if self.network.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "network.timeout_secs",
                "0",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
