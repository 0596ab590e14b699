//! Error types for ring construction and configuration.

/// Errors that can occur while building a ring or loading its configuration.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The replica count must be at least 1.
    ///
    /// A ring with zero replicas per node can never own a position, so every
    /// node added to it would be unaddressable.
    #[error("invalid replica count {0}: must be at least 1")]
    InvalidReplicaCount(usize),

    /// The configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// An I/O error occurred while reading a configuration file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for RingError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
