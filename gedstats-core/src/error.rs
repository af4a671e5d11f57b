//! Error types for gedstats-core

use thiserror::Error;

/// Main error type for the gedstats-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Query error (structurally invalid record stream, not merely sparse)
    #[error("query error: {0}")]
    Query(String),
}

/// Result type alias for gedstats-core
pub type Result<T> = std::result::Result<T, Error>;
