//! Error types for status lookups in cleargrass-types.

use thiserror::Error;

/// Errors that can occur when reading ClearGrass status data.
///
/// This error type is transport-agnostic and does not include
/// driver errors (those belong in cleargrass-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StatusError {
    /// A property without a fallback was absent from the device response.
    #[error("Missing property: {0}")]
    MissingProperty(String),

    /// The device reported a model id that is not a known monitor.
    #[error("Unknown model: {0}")]
    UnknownModel(String),
}

impl StatusError {
    /// Create a missing property error.
    pub fn missing(property: impl Into<String>) -> Self {
        Self::MissingProperty(property.into())
    }
}

/// Result type alias using cleargrass-types' StatusError type.
pub type StatusResult<T> = std::result::Result<T, StatusError>;
