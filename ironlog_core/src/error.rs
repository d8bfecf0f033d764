//! Error types for the ironlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ironlog_core operations
///
/// Expected business-rule failures (duplicate names, terminal sessions,
/// blocked deletions) are carried as dedicated variants so callers can
/// branch on the kind without parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity absent, or owned by a different user (indistinguishable
    /// on purpose)
    #[error("{0}")]
    NotFound(String),

    /// Per-user name uniqueness violation caught by a service pre-check
    #[error("{0}")]
    DuplicateName(String),

    /// Deletion blocked by a referencing record
    #[error("{0}")]
    InUse(String),

    /// A second session start while one is still active
    #[error("You already have an active workout session. Complete or cancel it first.")]
    SessionAlreadyActive,

    /// Mutation attempted on a session that has already been completed
    #[error("{0}")]
    SessionCompleted(String),

    /// Completing a session a second time
    #[error("Session is already completed.")]
    AlreadyCompleted,

    /// Constraint violation detected at commit time, surfacing a race the
    /// service pre-checks missed
    #[error("Storage conflict: {0}")]
    Conflict(String),
}
