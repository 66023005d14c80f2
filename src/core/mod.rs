/// Core Module for sqlscribe
///
/// This module holds the error taxonomy and the database layer that executes
/// rendered statements against SQLite.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, SqlscribeError};
