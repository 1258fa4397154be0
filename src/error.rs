//! Error types for the Friday agent

use thiserror::Error;

/// Result type alias for Friday operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Friday agent
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Smart-home bridge error
    #[error("bridge error: {0}")]
    Bridge(String),

    /// Realtime session error
    #[error("session error: {0}")]
    Session(String),

    /// Tool invocation error
    #[error("tool error: {0}")]
    Tool(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
