// File: ./src/error.rs
//! Typed errors raised by the scheduling core and the vault scanner.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// A reminder date that could not be parsed or projected.
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// A date key (configured range bound or allow-list entry) that is not a calendar date.
    #[error("Malformed date key '{key}'")]
    MalformedDate { key: String },

    /// A note whose reminder field was found but could not be turned into a record.
    #[error("Skipped note '{}': {source}", .path.display())]
    SkippedNote {
        path: PathBuf,
        #[source]
        source: Box<TimelineError>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TimelineError {
    pub fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = TimelineError> = std::result::Result<T, E>;
