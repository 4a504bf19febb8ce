//! Core error types for habitloom-core.
//!
//! This module defines the error hierarchy using thiserror. Analysis
//! failures are pure and synchronous; none of them are retryable.

use std::path::PathBuf;
use thiserror::Error;

use crate::habit::Periodicity;

/// Core error type for habitloom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Habit analysis errors
    #[error("Analysis error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No user with the given name exists
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// No habit with the given name exists for the user
    #[error("Unknown habit '{habit}' for user '{user}'")]
    UnknownHabit { user: String, habit: String },

    /// A stored date string could not be parsed
    #[error("Invalid date '{value}' in column {column}")]
    InvalidDate { column: &'static str, value: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors produced by the streak/break analysis engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// An unrecognized periodicity tag. Fatal to the calling operation;
    /// never silently defaulted.
    #[error("Unrecognized periodicity '{0}' (expected daily, weekly, monthly or yearly)")]
    InvalidPeriodicity(String),

    /// Analysis was requested for a habit with zero completions.
    #[error("Habit has no completions to analyze")]
    EmptyHistory,

    /// The completion rate is only defined for daily and weekly habits.
    #[error("Completion rate is not applicable to {0} habits")]
    RateNotApplicable(Periodicity),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
