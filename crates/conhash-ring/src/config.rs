//! TOML configuration for a hash ring.
//!
//! Embedding services usually carry this as a `[ring]` section of their own
//! config file; it can also be loaded standalone with [`RingConfig::load`].

use std::path::Path;

use serde::Deserialize;

use crate::error::RingError;
use crate::hash::HashAlgorithm;

/// Replica count used when the config does not set one.
pub const DEFAULT_REPLICAS: usize = 160;

/// Ring configuration, parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Virtual positions per physical node.
    pub replicas: usize,
    /// Hash function used for both node and key positions.
    pub hash: HashAlgorithm,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hash: HashAlgorithm::default(),
        }
    }
}

impl RingConfig {
    /// Load and validate config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RingError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, RingError> {
        let config: RingConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config describes a usable ring.
    pub fn validate(&self) -> Result<(), RingError> {
        if self.replicas == 0 {
            return Err(RingError::InvalidReplicaCount(self.replicas));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = RingConfig::from_toml("").unwrap();
        assert_eq!(config, RingConfig::default());
        assert_eq!(config.replicas, DEFAULT_REPLICAS);
        assert_eq!(config.hash, HashAlgorithm::Crc32);
    }

    #[test]
    fn test_full_toml() {
        let config = RingConfig::from_toml(
            r#"
            replicas = 3
            hash = "blake3"
            "#,
        )
        .unwrap();
        assert_eq!(config.replicas, 3);
        assert_eq!(config.hash, HashAlgorithm::Blake3);
    }

    #[test]
    fn test_zero_replicas_rejected() {
        let err = RingConfig::from_toml("replicas = 0").unwrap_err();
        assert!(matches!(err, RingError::InvalidReplicaCount(0)));
    }

    #[test]
    fn test_unknown_hash_rejected() {
        let err = RingConfig::from_toml(r#"hash = "md5""#).unwrap_err();
        assert!(matches!(err, RingError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RingConfig::from_toml("vnodes = 12").unwrap_err();
        assert!(err.to_string().contains("vnodes"), "got {err}");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.toml");
        std::fs::write(&path, "replicas = 42\nhash = \"blake3\"\n").unwrap();

        let config = RingConfig::load(&path).unwrap();
        assert_eq!(config.replicas, 42);
        assert_eq!(config.hash, HashAlgorithm::Blake3);
    }

    #[test]
    fn test_load_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ring.toml");
        std::fs::write(&path, "replicas = 0\n").unwrap();

        let err = RingConfig::load(&path).unwrap_err();
        assert!(matches!(err, RingError::InvalidReplicaCount(0)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RingConfig::load(Path::new("/nonexistent/conhash/ring.toml")).unwrap_err();
        assert!(matches!(err, RingError::Io(_)));
    }
}
