use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid {field} port: {value:?}")]
    InvalidPort { field: &'static str, value: String },

    #[error("Failed to encode record: {0}")]
    EncodeError(String),

    #[error("Failed to decode record: {0}")]
    DecodeError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection to {server} failed: {reason}")]
    TransportConnect { server: String, reason: String },

    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("Record queue is closed")]
    QueueClosed,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
