//! Validation options
//!
//! Holds the options that shape a validation run: strictness and the
//! issue tags to ignore.

/// Options for a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Promote warnings to errors
    pub strict: bool,
    /// Issue tags to drop from reports
    pub ignore: Vec<String>,
}

impl ValidationConfig {
    /// Create a new ValidationConfig with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set tags to ignore
    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Check if issues with this tag should be reported
    pub fn should_report(&self, tag: &str) -> bool {
        !self.ignore.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ValidationConfig::new();
        assert!(!config.strict);
        assert!(config.should_report("content-rating-missing"));
    }

    #[test]
    fn test_config_ignore() {
        let config = ValidationConfig::new()
            .with_strict(true)
            .with_ignore(vec!["content-rating-missing".to_string()]);
        assert!(config.strict);
        assert!(!config.should_report("content-rating-missing"));
        assert!(config.should_report("url-not-http"));
    }
}
