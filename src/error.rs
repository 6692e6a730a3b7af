//! Error types for Niyantra

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Niyantra error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configuration was supplied at all
    #[error("Invalid configuration: no configuration given")]
    InvalidConfig,

    /// Required `entity` field is absent or empty
    #[error("Invalid configuration: missing entity")]
    MissingEntity,

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Attempted transition that would violate mode compatibility
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Parameter outside its accepted domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Selected area has no configured device-facing id
    #[error("Unknown area: {0}")]
    UnknownArea(String),

    /// Device could not be reached
    #[error("Device unreachable: {0}")]
    DeviceUnreachable(String),

    /// Device refused a command
    #[error("Command rejected: {0}")]
    CommandRejected(String),
}
