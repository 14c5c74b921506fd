//! Core error types for lifeos-core.
//!
//! Aggregation functions are total and never return these; errors come from
//! the boundaries: parsing dates, talking to SQLite, loading configuration and
//! managing accounts.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for lifeos-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Account and session errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A date string that is neither `YYYY-MM-DD` nor RFC 3339
    #[error("Invalid date '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate { input: String },

    /// Year/month pair outside the supported calendar
    #[error("Invalid month {year}-{month:02}: month must be 1-12")]
    InvalidMonth { year: i32, month: u32 },

    /// Progress outside 0-100
    #[error("Progress {0} is out of range 0-100")]
    ProgressOutOfRange(u32),

    /// Progress set by hand on a goal that derives it from milestones
    #[error("Goal '{goal_id}' derives its progress from milestones")]
    ProgressDerived { goal_id: String },

    /// Referenced record does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Account and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email already registered
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No one is logged in
    #[error("Not logged in")]
    NotLoggedIn,

    /// Account id does not exist
    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    /// Password hashing backend failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Changing the password without confirming the current one
    #[error("Current password is required to set a new password")]
    CurrentPasswordRequired,

    /// Password shorter than the minimum length
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_date_message_names_input() {
        let err = ValidationError::InvalidDate {
            input: "2024-13-01".to_string(),
        };
        assert!(err.to_string().contains("2024-13-01"));
    }

    #[test]
    fn rusqlite_errors_convert_to_core() {
        let err: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, CoreError::Database(DatabaseError::QueryFailed(_))));
    }
}
