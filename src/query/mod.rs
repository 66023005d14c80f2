/// Query Rendering Module
///
/// Pure functions that turn structured clause descriptions into literal SQL
/// text. Nothing here touches a connection; the same output can be executed
/// by the SQLite wrapper or handed to a client/server driver by choosing the
/// matching placeholder token.
///
/// ## Layout
///
/// - **Definitions** (`ddl.rs`): CREATE TABLE, DROP TABLE, foreign keys and
///   schema introspection statements
/// - **Data changes** (`dml.rs`): INSERT and UPDATE
/// - **Queries** (`select.rs`): SELECT with WHERE, GROUP BY, HAVING,
///   ORDER BY and LIMIT clauses
pub mod ddl;
pub mod dml;
pub mod select;

pub use ddl::*;
pub use dml::*;
pub use select::*;

/// Placeholder used by SQLite's native parameter binding.
pub const SQLITE_PLACEHOLDER: &str = "?";

/// Placeholder used by client/server drivers in the `format` paramstyle.
pub const FORMAT_PLACEHOLDER: &str = "%s";
