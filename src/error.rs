use thiserror::Error;

/// Main error type for Eventflow operations
#[derive(Error, Debug)]
pub enum EventflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Identity resolution error: {0}")]
    Resolver(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EventflowError>;
