//! Error handling for geoaudit-store
//!
//! Wraps geoaudit-core ExError with store-specific helpers

use geoaudit_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a stored snapshot that is not valid JSON
pub fn corrupt_snapshot(layer: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("load_snapshot")
        .with_layer(layer)
        .with_message(format!("stored snapshot is not valid JSON: {}", err))
}

/// Create an error for a collection that cannot be encoded
pub fn encode_error(layer: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("save_snapshot")
        .with_layer(layer)
        .with_message(err.to_string())
}
