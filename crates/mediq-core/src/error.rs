use thiserror::Error;

/// Top-level error type for the Mediq system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for MediqError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MediqError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transcript capacity exhausted: {0}")]
    CapacityExhausted(String),

    #[error("Malformed stored transcript: {0}")]
    MalformedTranscript(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MediqError {
    fn from(err: toml::de::Error) -> Self {
        MediqError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MediqError {
    fn from(err: toml::ser::Error) -> Self {
        MediqError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MediqError {
    fn from(err: serde_json::Error) -> Self {
        MediqError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Mediq operations.
pub type Result<T> = std::result::Result<T, MediqError>;
