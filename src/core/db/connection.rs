/// Connection Management Module
///
/// `SqliteConnection` owns one SQLite handle for its whole lifetime. Table
/// lifecycle and insert operations render their statement text through the
/// `query` module and execute it here. Pending work is committed when the
/// connection is closed or dropped.

use super::rows::{InsertData, RowData};
use super::schema::{first_column, ColumnInfo, LazyRows};
use crate::config::SqliteConfig;
use crate::core::{Result, SqlscribeError};
use crate::fields::FieldInput;
use crate::query::{
    render_create_table, render_drop_table, render_insert, render_list_tables, render_table_fields,
    SQLITE_PLACEHOLDER,
};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wrapper around one embedded SQLite connection.
///
/// Inserts run inside an implicit transaction that stays open until
/// [`commit`](SqliteConnection::commit), a table creation, or scope exit.
#[derive(Debug)]
pub struct SqliteConnection {
    /// Active connection (None once closed)
    conn: Option<Connection>,
    /// Path to the database file (None for in-memory databases)
    path: Option<String>,
}

impl SqliteConnection {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &SqliteConfig::default())
    }

    /// Opens the database file at `path` and applies `config`.
    pub fn open_with<P: AsRef<Path>>(path: P, config: &SqliteConfig) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened SQLite database at {}", path.display());
        Self::configure(conn, Some(path.display().to_string()), config)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn, None, &SqliteConfig::default())
    }

    fn configure(conn: Connection, path: Option<String>, config: &SqliteConfig) -> Result<Self> {
        match config.foreign_keys {
            Some(true) => conn.execute_batch("PRAGMA foreign_keys = ON;")?,
            Some(false) => conn.execute_batch("PRAGMA foreign_keys = OFF;")?,
            None => {}
        }
        if let Some(ms) = config.busy_timeout_ms {
            conn.busy_timeout(Duration::from_millis(ms))?;
        }
        Ok(SqliteConnection {
            conn: Some(conn),
            path,
        })
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The underlying rusqlite connection, for statements this wrapper does
    /// not cover.
    pub fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SqlscribeError::Unsupported("connection is already closed".to_string()))
    }

    /// Streams the name of every table in the database.
    pub fn list_tables(&self) -> Result<LazyRows<'_, String>> {
        let sql = render_list_tables();
        debug!("Executing: {}", sql);
        let stmt = self.connection()?.prepare(sql)?;
        Ok(LazyRows::new(stmt, first_column))
    }

    /// Streams column metadata for `table`. A missing table yields no rows.
    pub fn describe_table(&self, table: &str) -> Result<LazyRows<'_, ColumnInfo>> {
        let sql = render_table_fields(table);
        debug!("Executing: {}", sql);
        let stmt = self.connection()?.prepare(&sql)?;
        Ok(LazyRows::new(stmt, ColumnInfo::from_pragma_row))
    }

    /// Normalizes `fields`, renders `CREATE TABLE IF NOT EXISTS`, executes it
    /// and commits.
    pub fn create_table(&self, table: &str, fields: &FieldInput) -> Result<()> {
        let specs = fields.normalize()?;
        let sql = render_create_table(table, &specs)?;
        self.execute_and_commit(&sql)?;
        info!("Created table {}", table);
        Ok(())
    }

    /// Executes a caller-written statement (or batch) verbatim and commits.
    pub fn create_table_with_sql(&self, sql: &str) -> Result<()> {
        self.execute_and_commit(sql)
    }

    fn execute_and_commit(&self, sql: &str) -> Result<()> {
        debug!("Executing: {}", sql);
        let conn = self.connection()?;
        conn.execute_batch(sql)?;
        commit_pending(conn)?;
        Ok(())
    }

    /// Drops `table`. A table that does not exist is reported as a notice and
    /// `Ok(false)` is returned; other engine failures propagate.
    pub fn drop_table(&self, table: &str) -> Result<bool> {
        let sql = render_drop_table(table);
        debug!("Executing: {}", sql);
        match self.connection()?.execute(&sql, []) {
            Ok(_) => {
                info!("Dropped table {}", table);
                Ok(true)
            }
            Err(err) => {
                let err = SqlscribeError::from(err);
                if err.is_operational() {
                    warn!("{} does not exist: {}", table, err);
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Inserts one row or a batch of rows into `table` and returns the number
    /// of rows written. The INSERT is rendered and prepared once; a batch
    /// executes it once per row.
    pub fn insert_rows(&self, table: &str, data: impl Into<InsertData>) -> Result<usize> {
        let (fields, rows) = data.into().validate()?;
        let sql = render_insert(table, &fields, SQLITE_PLACEHOLDER)?;
        debug!("Executing: {} ({} row(s))", sql, rows.row_count());

        let conn = self.connection()?;
        begin_if_autocommit(conn)?;
        let mut stmt = conn.prepare_cached(&sql)?;
        let written = match rows {
            RowData::Single(row) => stmt.execute(params_from_iter(row.iter()))?,
            RowData::Many(rows) => {
                for row in &rows {
                    stmt.execute(params_from_iter(row.iter()))?;
                }
                rows.len()
            }
        };
        Ok(written)
    }

    /// Query execution through the wrapper is not implemented; use
    /// [`connection`](SqliteConnection::connection) with a rendered
    /// [`QuerySpec`](crate::query::QuerySpec) instead.
    pub fn select(&self, _sql: Option<&str>) -> Result<Vec<Vec<rusqlite::types::Value>>> {
        Err(SqlscribeError::Unsupported("select is not implemented".to_string()))
    }

    /// CSV export is not implemented.
    pub fn table_to_csv<P: AsRef<Path>>(&self, _table: &str, _csv_path: P) -> Result<()> {
        Err(SqlscribeError::Unsupported("CSV export is not implemented".to_string()))
    }

    /// CSV import is not implemented.
    pub fn csv_to_table<P: AsRef<Path>>(&self, _csv_path: P, _table: &str) -> Result<()> {
        Err(SqlscribeError::Unsupported("CSV import is not implemented".to_string()))
    }

    /// Commits any open transaction.
    pub fn commit(&self) -> Result<()> {
        commit_pending(self.connection()?)?;
        Ok(())
    }

    /// Commits pending work and closes the handle.
    pub fn close(mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            commit_pending(&conn)?;
            conn.close().map_err(|(_, e)| SqlscribeError::Database(e))?;
            debug!("Closed database {}", self.path.as_deref().unwrap_or(":memory:"));
        }
        Ok(())
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = commit_pending(&conn) {
                warn!("Failed to commit on drop: {}", e);
            }
            if let Err((_, e)) = conn.close() {
                warn!("Failed to close database: {}", e);
            }
        }
    }
}

/// Opens the database at `path`, runs `f`, then commits and closes whether
/// or not `f` succeeded. An error from `f` takes precedence over one from
/// closing.
pub fn with_connection<P, T, F>(path: P, f: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&SqliteConnection) -> Result<T>,
{
    with_connection_config(path, &SqliteConfig::default(), f)
}

/// Like [`with_connection`], applying `config` when opening.
pub fn with_connection_config<P, T, F>(path: P, config: &SqliteConfig, f: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&SqliteConnection) -> Result<T>,
{
    let conn = SqliteConnection::open_with(path, config)?;
    let outcome = f(&conn);
    let closed = conn.close();
    let value = outcome?;
    closed?;
    Ok(value)
}

fn begin_if_autocommit(conn: &Connection) -> rusqlite::Result<()> {
    if conn.is_autocommit() {
        conn.execute_batch("BEGIN")?;
    }
    Ok(())
}

fn commit_pending(conn: &Connection) -> rusqlite::Result<()> {
    if !conn.is_autocommit() {
        conn.execute_batch("COMMIT")?;
    }
    Ok(())
}
