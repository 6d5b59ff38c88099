use thiserror::Error;

/// Domain-level errors for MacModel.
///
/// Probe failures (`PropertyRead`, `CommandExecution`, `CommandTimeout`) are
/// recovered inside the adapters and never reach callers of the resolver.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("System property '{key}' could not be read: {reason}")]
    PropertyRead { key: String, reason: String },

    #[error("Command '{program}' failed: {reason}")]
    CommandExecution { program: String, reason: String },

    #[error("Command '{program}' timed out after {timeout_ms} ms")]
    CommandTimeout { program: String, timeout_ms: u64 },

    #[error("Model catalog error: {0}")]
    Catalog(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
