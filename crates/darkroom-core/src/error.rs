//! Error types for the Darkroom batch processing engine.
//!
//! Errors are organized by failure granularity: envelope-level parse errors,
//! per-item extraction errors, and per-item processing errors. None of them
//! ever escapes the engine's top-level loop — they surface only as failure
//! counts in the `BatchResult` and as log lines attributed to the item key.

use thiserror::Error;

/// Top-level error type for Darkroom operations.
#[derive(Error, Debug)]
pub enum DarkroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification event parsing errors
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    /// Per-item processing errors
    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Notification parsing errors, organized by granularity.
///
/// `Envelope` is charged to the envelope that carried the payload;
/// the other variants are charged to a single item event.
#[derive(Error, Debug)]
pub enum EventError {
    /// The envelope's inner message is not a parseable event group
    #[error("Unparsable envelope payload: {0}")]
    Envelope(#[source] serde_json::Error),

    /// An item event is missing a required field or has the wrong shape
    #[error("Malformed item event: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    /// Bucket or key is present but empty
    #[error("Empty {field} in item event")]
    EmptyField { field: &'static str },
}

/// Object storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested object does not exist
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Any other backend failure (I/O, permissions, ...)
    #[error("Storage backend error for {bucket}/{key}: {message}")]
    Backend {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Per-item processing errors. One of these fails exactly one item;
/// the engine logs it and moves on to the next item in the batch.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Download or upload failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Source bytes could not be decoded into an image
    #[error("Decode error for {key}: {message}")]
    Decode { key: String, message: String },

    /// Transform output could not be re-encoded
    #[error("Encode error for {key}: {message}")]
    Encode { key: String, message: String },

    /// The transform itself failed
    #[error("Transform failed for {key}: {message}")]
    Transform { key: String, message: String },
}

/// Convenience type alias for Darkroom results.
pub type Result<T> = std::result::Result<T, DarkroomError>;
