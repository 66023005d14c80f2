//! Row insertion and update statements.
use super::ddl::require_table;
use crate::core::{Result, SqlscribeError};

/// Renders `INSERT INTO <table>(<f1>, <f2>, ...) VALUES (<p>, <p>, ...);` with
/// one placeholder per field.
pub fn render_insert<S: AsRef<str>>(table: &str, fields: &[S], placeholder: &str) -> Result<String> {
    require_table(table)?;
    require_fields(fields, "INSERT")?;

    let names: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
    let slots = vec![placeholder; fields.len()];
    Ok(format!(
        "INSERT INTO {}({}) VALUES ({});",
        table,
        names.join(", "),
        slots.join(", ")
    ))
}

/// Renders `UPDATE <table> SET <f1> = <p>, ... WHERE <where_field> = <p>`.
///
/// Unlike the other statements this one carries no trailing semicolon.
pub fn render_update<S: AsRef<str>>(
    table: &str,
    fields: &[S],
    where_field: &str,
    placeholder: &str,
) -> Result<String> {
    require_table(table)?;
    require_fields(fields, "UPDATE")?;
    if where_field.trim().is_empty() {
        return Err(SqlscribeError::Validation(
            "UPDATE needs a field for its WHERE clause".to_string(),
        ));
    }

    let assignments: Vec<String> = fields
        .iter()
        .map(|field| format!("{} = {}", field.as_ref(), placeholder))
        .collect();
    Ok(format!(
        "UPDATE {} SET {} WHERE {} = {}",
        table,
        assignments.join(", "),
        where_field,
        placeholder
    ))
}

fn require_fields<S: AsRef<str>>(fields: &[S], statement: &str) -> Result<()> {
    if fields.is_empty() {
        return Err(SqlscribeError::Validation(format!(
            "{} needs at least one field",
            statement
        )));
    }
    if fields.iter().any(|f| f.as_ref().trim().is_empty()) {
        return Err(SqlscribeError::Validation(format!(
            "{} field names must not be empty",
            statement
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FORMAT_PLACEHOLDER, SQLITE_PLACEHOLDER};

    #[test]
    fn test_insert_question_mark_placeholder() {
        assert_eq!(
            render_insert("test", &["id", "name"], SQLITE_PLACEHOLDER).unwrap(),
            "INSERT INTO test(id, name) VALUES (?, ?);"
        );
    }

    #[test]
    fn test_insert_percent_s_placeholder() {
        assert_eq!(
            render_insert("test", &["id", "name"], FORMAT_PLACEHOLDER).unwrap(),
            "INSERT INTO test(id, name) VALUES (%s, %s);"
        );
    }

    #[test]
    fn test_insert_requires_fields() {
        let none: [&str; 0] = [];
        assert!(matches!(render_insert("test", &none, "?"), Err(SqlscribeError::Validation(_))));
    }

    #[test]
    fn test_update_question_mark_placeholder() {
        assert_eq!(
            render_update("tasks", &["priority", "begin_date", "end_date"], "id", "?").unwrap(),
            "UPDATE tasks SET priority = ?, begin_date = ?, end_date = ? WHERE id = ?"
        );
    }

    #[test]
    fn test_update_percent_s_placeholder() {
        let fields = vec!["priority".to_string(), "begin_date".to_string(), "end_date".to_string()];
        assert_eq!(
            render_update("tasks", &fields, "id", "%s").unwrap(),
            "UPDATE tasks SET priority = %s, begin_date = %s, end_date = %s WHERE id = %s"
        );
    }

    #[test]
    fn test_update_requires_where_field() {
        assert!(render_update("tasks", &["priority"], " ", "?").is_err());
    }
}
