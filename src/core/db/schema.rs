/// Schema Introspection Module
///
/// Column metadata for a table and a lazily evaluated row handle used by the
/// table listing and table description operations.

use crate::core::{Result, SqlscribeError};
use rusqlite::{Row, Statement};

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Zero-based column position
    pub cid: i64,
    /// Column name
    pub name: String,
    /// Declared type (e.g., "INTEGER", "TEXT", "REAL", "BLOB")
    pub type_name: String,
    /// Whether the column was declared NOT NULL
    pub notnull: bool,
    /// Default value expression (if any)
    pub dflt_value: Option<String>,
    /// Position in the primary key, 0 when not part of it
    pub pk: i64,
}

impl ColumnInfo {
    /// Creates a ColumnInfo from a PRAGMA table_info result row
    pub(crate) fn from_pragma_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ColumnInfo {
            cid: row.get(0)?,
            name: row.get(1)?,
            type_name: row.get(2)?,
            notnull: row.get(3)?,
            dflt_value: row.get(4)?,
            pk: row.get(5)?,
        })
    }
}

pub(crate) fn first_column(row: &Row<'_>) -> rusqlite::Result<String> {
    row.get(0)
}

/// A prepared statement whose rows are produced on demand.
///
/// Nothing is fetched until [`LazyRows::iter`] is called; the returned
/// iterator steps the engine's cursor one row at a time. The sequence is
/// forward-only and runs once: after the first call, `iter` yields nothing.
pub struct LazyRows<'conn, T> {
    stmt: Statement<'conn>,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
    started: bool,
}

impl<'conn, T> LazyRows<'conn, T> {
    pub(crate) fn new(stmt: Statement<'conn>, map: fn(&Row<'_>) -> rusqlite::Result<T>) -> Self {
        LazyRows {
            stmt,
            map,
            started: false,
        }
    }

    /// Runs the statement and returns a forward-only iterator over its rows.
    /// Rows left unread when the iterator is dropped are not produced again.
    pub fn iter<'s>(&'s mut self) -> Result<impl Iterator<Item = Result<T>> + 's>
    where
        T: 's,
    {
        let rows = if self.started {
            None
        } else {
            self.started = true;
            let map = self.map;
            Some(self.stmt.query_map([], map)?)
        };
        Ok(rows
            .into_iter()
            .flatten()
            .map(|row| row.map_err(SqlscribeError::from)))
    }

    /// Drains every remaining row into a vector.
    pub fn collect_all(mut self) -> Result<Vec<T>> {
        let rows = self.iter()?.collect();
        rows
    }
}
