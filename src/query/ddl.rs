//! Table definition and introspection statements.
use crate::core::{Result, SqlscribeError};
use crate::fields::FieldSpec;

/// Renders `CREATE TABLE IF NOT EXISTS <table> (<field> <TYPE>[ <EXTRA>], ...);`
/// keeping the field order given.
pub fn render_create_table(table: &str, fields: &[FieldSpec]) -> Result<String> {
    require_table(table)?;
    if fields.is_empty() {
        return Err(SqlscribeError::Validation(format!(
            "table '{}' needs at least one field",
            table
        )));
    }

    let columns: Vec<String> = fields
        .iter()
        .map(|field| match field.extra() {
            Some(extra) => format!("{} {} {}", field.name(), field.data_type(), extra),
            None => format!("{} {}", field.name(), field.data_type()),
        })
        .collect();

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        table,
        columns.join(", ")
    ))
}

/// Renders `DROP TABLE <table>;`.
pub fn render_drop_table(table: &str) -> String {
    format!("DROP TABLE {};", table)
}

/// Renders a table constraint linking `key` to the same column in `foreign_table`.
pub fn render_foreign_key(foreign_table: &str, foreign_key: &str) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        foreign_key, foreign_table, foreign_key
    )
}

/// Renders the SQLite pragma describing each column of `table`.
pub fn render_table_fields(table: &str) -> String {
    format!("PRAGMA table_info({});", table)
}

/// Renders the statement listing every table name in a SQLite database.
pub fn render_list_tables() -> &'static str {
    "SELECT name FROM sqlite_master WHERE type='table';"
}

pub(crate) fn require_table(table: &str) -> Result<()> {
    if table.trim().is_empty() {
        return Err(SqlscribeError::Validation(
            "table name must not be empty".to_string(),
        ));
    }
    Ok(())
}
