//! Error types for the limiter.
//!
//! A rejected admission is not an error; it is reported as a plain `bool`
//! by [`crate::Limiter::is_free`]. Errors only come from parsing names.

use thiserror::Error;

/// Main error type for windowlimit operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// A granularity name that is not one of second, minute, hour, day, month
    #[error("Unknown granularity: {0}")]
    UnknownGranularity(String),

    /// A time zone policy name that is not `utc` or `local`
    #[error("Unknown time zone policy: {0}")]
    UnknownTimeZone(String),
}

/// Result type alias for windowlimit operations.
pub type Result<T> = std::result::Result<T, LimitError>;
