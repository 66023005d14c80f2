/// Database Module
///
/// This module wraps an embedded SQLite database behind a small API for table
/// lifecycle and row insertion, organized into focused submodules.
///
/// ## Architecture
///
/// - **Connection Management** (`connection.rs`): owns the engine handle, executes
///   rendered statements, and commits then closes on scope exit
/// - **Schema Introspection** (`schema.rs`): column metadata and lazily streamed rows
/// - **Row Input** (`rows.rs`): row-major and columnar insert data and its validation
/// - **Remote** (`remote.rs`): credentials and a placeholder wrapper for a
///   client/server database
///
/// ## Error Handling
///
/// All database operations use the standardized `SqlscribeError` type for consistent error propagation.
pub mod connection;
pub mod remote;
pub mod rows;
pub mod schema;

pub use connection::*;
pub use remote::*;
pub use rows::*;
pub use schema::*;
