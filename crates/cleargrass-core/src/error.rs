//! Error types for cleargrass-core.
//!
//! Driver failures are opaque: the driver owns its transport and its error
//! type, this crate only boxes and forwards them.
//!
//! | Error | Where it surfaces | Host action |
//! |-------|-------------------|-------------|
//! | [`Error::Driver`] | commands, [`crate::AirQualityMonitor::status`] | report; the next poll tick tries again |
//! | [`Error::NotReady`] | [`crate::setup`] | retry setup on the host's own schedule |
//! | [`Error::Status`] | [`crate::AirQualityMonitor::status`] consumers | report |
//! | [`Error::InvalidSchedule`] | [`crate::AirQualityMonitor::set_night_time`] | fix the arguments |
//! | [`Error::InvalidConfig`] | [`crate::setup`] | fix configuration and restart |
//!
//! [`crate::PollingAdapter::poll`] never returns any of these; it logs them
//! and flips the entity to unavailable.

use thiserror::Error;

/// Boxed driver-specific error.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when talking to a ClearGrass monitor.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The driver failed to complete a request.
    #[error("Driver error during '{method}': {source}")]
    Driver {
        /// Driver method that was invoked.
        method: String,
        /// Driver-specific cause.
        #[source]
        source: DriverError,
    },

    /// The device could not be reached during setup. The host should retry.
    #[error("Device at {host} is not ready: {source}")]
    NotReady {
        /// Configured host address.
        host: String,
        /// Underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// The device response lacked a required property.
    #[error(transparent)]
    Status(#[from] cleargrass_types::StatusError),

    /// Night schedule offsets fall outside a single day.
    #[error("Begin or end time invalid: begin={begin}s, end={end}s (allowed 0..=86399)")]
    InvalidSchedule {
        /// Begin offset in seconds since midnight.
        begin: i64,
        /// End offset in seconds since midnight.
        end: i64,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap a driver failure for `method`.
    pub fn driver(method: impl Into<String>, source: impl Into<DriverError>) -> Self {
        Self::Driver {
            method: method.into(),
            source: source.into(),
        }
    }

    /// Create a not-ready error for `host`.
    pub fn not_ready(host: impl Into<String>, source: Error) -> Self {
        Self::NotReady {
            host: host.into(),
            source: Box::new(source),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether the host should retry the failed operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady { .. } | Self::Driver { .. })
    }
}

/// Result type alias using cleargrass-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
