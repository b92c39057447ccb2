//! Chain configuration.
//!
//! ```rust
//! use delegate_rs::ChainConfig;
//!
//! let config = ChainConfig::from_json_str(r#"{ "max_links": 8 }"#).unwrap();
//! assert_eq!(config.max_links, 8);
//! assert!(!config.legacy_reply_format);
//! ```

use crate::error::{ChainError, ChainResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound accepted for [`ChainConfig::max_links`].
///
/// Wrap chains dispatch one nested call per link, so the chain length is
/// also the stack depth of a request.
pub const MAX_LINKS_CEILING: usize = 512;

/// Configuration for chain assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Maximum number of links a single chain may hold
    pub max_links: usize,
    /// Reproduce the legacy `"AutomationC C"` reply of the demo catalog
    pub legacy_reply_format: bool,
    /// Name recorded on log events
    pub label: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_links: 256,
            legacy_reply_format: false,
            label: "chain".to_string(),
        }
    }
}

impl ChainConfig {
    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> ChainResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ChainResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading chain config");
        Self::from_json_str(&raw)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> ChainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject capacities outside `1..=MAX_LINKS_CEILING`
    pub fn validate(&self) -> ChainResult<()> {
        if self.max_links == 0 {
            return Err(ChainError::invalid("max_links must be at least 1"));
        }
        if self.max_links > MAX_LINKS_CEILING {
            return Err(ChainError::invalid(format!(
                "max_links must be at most {}, got {}",
                MAX_LINKS_CEILING, self.max_links
            )));
        }
        Ok(())
    }

    /// Set maximum number of links
    pub fn max_links(mut self, max_links: usize) -> Self {
        self.max_links = max_links;
        self
    }

    /// Toggle the legacy reply format
    pub fn legacy_reply_format(mut self, enabled: bool) -> Self {
        self.legacy_reply_format = enabled;
        self
    }

    /// Set the log label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChainConfig::default();
        assert_eq!(config.max_links, 256);
        assert!(!config.legacy_reply_format);
        assert_eq!(config.label, "chain");
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = ChainConfig::from_json_str(r#"{ "legacy_reply_format": true }"#).unwrap();
        assert!(config.legacy_reply_format);
        assert_eq!(config.max_links, 256);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = ChainConfig::from_json_str(r#"{ "max_links": 0 }"#);
        assert!(matches!(result, Err(ChainError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_capacity_ceiling() {
        let at_ceiling = format!(r#"{{ "max_links": {} }}"#, MAX_LINKS_CEILING);
        assert_eq!(
            ChainConfig::from_json_str(&at_ceiling).unwrap().max_links,
            MAX_LINKS_CEILING
        );

        for max_links in [MAX_LINKS_CEILING + 1, 1_000_000] {
            let json = format!(r#"{{ "max_links": {} }}"#, max_links);
            let error = ChainConfig::from_json_str(&json).unwrap_err();
            assert!(matches!(error, ChainError::InvalidConfiguration(_)));
        }
        assert!(ChainConfig::default()
            .max_links(MAX_LINKS_CEILING + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_malformed_document() {
        let result = ChainConfig::from_json_str("max_links = 3");
        assert!(matches!(result, Err(ChainError::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ChainConfig::default().max_links(3).label("automations");
        let json = config.to_json_string().unwrap();
        assert_eq!(ChainConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_links": 4, "label": "notifiers" }}"#).unwrap();

        let config = ChainConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_links, 4);
        assert_eq!(config.label, "notifiers");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChainConfig::from_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(ChainError::Io(_))));
    }
}
