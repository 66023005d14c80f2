//! sqlscribe renders SQL statement text from structured descriptions and
//! wraps an embedded SQLite database for table lifecycle and row insertion.
//!
//! ```
//! use sqlscribe::{FieldInput, InsertData, SqliteConnection, Value};
//!
//! let conn = SqliteConnection::open_in_memory().unwrap();
//! let fields = FieldInput::tuples([vec!["id", "INTEGER", "NOT NULL"], vec!["name", "TEXT"]]);
//! conn.create_table("people", &fields).unwrap();
//! let rows = vec![
//!     vec![Value::Integer(1), Value::Text("Ada".into())],
//!     vec![Value::Integer(2), Value::Text("Grace".into())],
//! ];
//! assert_eq!(conn.insert_rows("people", InsertData::rows(["id", "name"], rows)).unwrap(), 2);
//! conn.close().unwrap();
//! ```

// Core infrastructure modules
pub mod core;

// Statement rendering and input normalization
pub mod config;
pub mod fields;
pub mod query;

pub use crate::core::db::{
    with_connection, with_connection_config, ColumnInfo, ColumnarData, InsertData, LazyRows,
    RemoteConfig, RemoteConnection, RowData, SqliteConnection, Value,
};
pub use crate::core::{Result, SqlscribeError};
pub use fields::{DataType, FieldInput, FieldSpec};
pub use query::QuerySpec;
