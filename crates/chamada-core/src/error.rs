//! Error types for chamada-core.
//!
//! Three failure families, kept deliberately distinct: bad expansion input
//! (rejected before any I/O), backend/transport failures, and local roster
//! misuse. Partial association failure is *not* an error -- it is reported
//! as counts by [`crate::generate::AssociationSummary`].

use chrono::{NaiveDate, NaiveTime};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for chamada-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("backend error: {0}")]
    Api(#[from] ApiError),

    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Custom(String),
}

/// Recurrence input rejected before any candidate is produced.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date range is inverted: {from} is after {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("no weekdays selected")]
    EmptyWeekdays,

    #[error("weekday selector {0} out of range (0 = Sunday .. 6 = Saturday)")]
    WeekdayOutOfRange(u8),

    #[error("time window is empty: start {start} must be before end {end}")]
    EmptyTimeWindow { start: NaiveTime, end: NaiveTime },

    #[error("missing value for '{0}'")]
    MissingField(&'static str),
}

/// A backend call failed. Transport trouble and application-level
/// rejections surface uniformly as "operation failed, with a reason".
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid backend URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; carries the backend's `message` field when present.
    #[error("{0}")]
    Backend(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Local roster state machine misuse.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RosterError {
    #[error("student {0} is not on the roster")]
    UnknownStudent(i64),

    #[error("an attendance update for student {0} is already in flight")]
    UpdateInFlight(i64),
}

/// Configuration load/save failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
