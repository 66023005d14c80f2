/// Sqlscribe Error Module
///
/// This module defines the error taxonomy shared by the renderer, the field
/// normalizer and the connection wrapper. Input-shape problems are reported
/// before any statement reaches the engine; engine failures are wrapped as-is.
use rusqlite::ErrorCode;
use thiserror::Error;

/// Error type for every fallible operation in sqlscribe.
///
/// - `Validation`: malformed field, operator or clause shapes and counts
/// - `Type`: the wrong container shape for a fields or rows argument
/// - `Value`: arity mismatches between field names and row values
/// - `Database`: the engine rejected or failed a statement
#[derive(Error, Debug)]
pub enum SqlscribeError {
    /// Malformed field descriptions, operators, or clause lengths
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arguments that are not one of the accepted container shapes
    #[error("Type error: {0}")]
    Type(String),

    /// Row arity that disagrees with the field-name arity
    #[error("Value error: {0}")]
    Value(String),

    /// Errors reported by SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration file and environment errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors for JSON-shaped field and row input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operations that exist in the API but have no implementation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl SqlscribeError {
    /// Returns `true` when the engine rejected a statement with a generic
    /// `SQLITE_ERROR`, such as a missing table or a syntax error.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            SqlscribeError::Database(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::Unknown
        )
    }
}

/// Type alias for Result to use SqlscribeError as the error type.
pub type Result<T> = std::result::Result<T, SqlscribeError>;
