/// Row Input Module
///
/// Insert data arrives either row-major (field names plus one or many tuples)
/// or columnar (one list of values per field). Both are validated and brought
/// to row-major form before any statement is executed.
use crate::core::{Result, SqlscribeError};
pub use rusqlite::types::Value;
use serde_json::Value as JsonValue;

const ROWS_SHAPE_HINT: &str = "fields must be a tuple, while data can be a tuple or a list of tuples";
const DATA_SHAPE_HINT: &str = "data can be a tuple or a list of tuples";

/// One row, or an ordered batch of rows, aligned positionally with field names.
#[derive(Debug, Clone, PartialEq)]
pub enum RowData {
    Single(Vec<Value>),
    Many(Vec<Vec<Value>>),
}

impl RowData {
    /// Number of rows held.
    pub fn row_count(&self) -> usize {
        match self {
            RowData::Single(_) => 1,
            RowData::Many(rows) => rows.len(),
        }
    }

    /// Interprets JSON row data: an array of scalars is one row, an array of
    /// arrays is many rows, and an empty array is an empty batch.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| SqlscribeError::Type(ROWS_SHAPE_HINT.to_string()))?;

        if items.is_empty() {
            return Ok(RowData::Many(Vec::new()));
        }
        if items.iter().all(JsonValue::is_array) {
            let rows = items
                .iter()
                .filter_map(JsonValue::as_array)
                .map(|row| row.iter().map(json_scalar).collect::<Result<Vec<_>>>())
                .collect::<Result<Vec<_>>>()?;
            return Ok(RowData::Many(rows));
        }
        if items.iter().any(JsonValue::is_array) {
            return Err(SqlscribeError::Type(DATA_SHAPE_HINT.to_string()));
        }
        Ok(RowData::Single(
            items.iter().map(json_scalar).collect::<Result<Vec<_>>>()?,
        ))
    }
}

impl From<Vec<Value>> for RowData {
    fn from(row: Vec<Value>) -> Self {
        RowData::Single(row)
    }
}

impl From<Vec<Vec<Value>>> for RowData {
    fn from(rows: Vec<Vec<Value>>) -> Self {
        RowData::Many(rows)
    }
}

/// Column-oriented insert data: one ordered list of values per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnarData {
    columns: Vec<(String, Vec<Value>)>,
}

impl ColumnarData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column; column order becomes field order.
    pub fn column<V: Into<Value>>(mut self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        self.columns
            .push((field.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Reads a JSON object mapping each field to an array of scalar values.
    /// Fields are taken in the order the keys appear in the source text.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            SqlscribeError::Type(
                "columnar data must be an object like {field: [value, ...], ...}".to_string(),
            )
        })?;

        let mut data = ColumnarData::new();
        for (field, values) in object {
            let values = values.as_array().ok_or_else(|| {
                SqlscribeError::Type(format!(
                    "column '{}' must be a list of values, even for a single value",
                    field
                ))
            })?;
            let values = values.iter().map(json_scalar).collect::<Result<Vec<_>>>()?;
            data.columns.push((field.clone(), values));
        }
        Ok(data)
    }

    /// Converts to field names plus row-major tuples. Every column must
    /// have as many values as the first one.
    pub fn into_rows(self) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        let expected = match self.columns.first() {
            Some((_, values)) => values.len(),
            None => {
                return Err(SqlscribeError::Validation(
                    "columnar data must contain at least one field".to_string(),
                ))
            }
        };
        if let Some((field, values)) = self.columns.iter().find(|(_, v)| v.len() != expected) {
            return Err(SqlscribeError::Validation(format!(
                "ensure that each field has a list of data of the same length: '{}' has {} value(s), expected {}",
                field,
                values.len(),
                expected
            )));
        }

        let (fields, mut columns): (Vec<String>, Vec<std::vec::IntoIter<Value>>) = self
            .columns
            .into_iter()
            .map(|(field, values)| (field, values.into_iter()))
            .unzip();
        let rows = (0..expected)
            .map(|_| columns.iter_mut().filter_map(|column| column.next()).collect())
            .collect();
        Ok((fields, rows))
    }
}

/// Data for one insert call, in either accepted shape.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertData {
    Rows { fields: Vec<String>, rows: RowData },
    Columnar(ColumnarData),
}

impl InsertData {
    pub fn rows<I, S>(fields: I, rows: impl Into<RowData>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InsertData::Rows {
            fields: fields.into_iter().map(Into::into).collect(),
            rows: rows.into(),
        }
    }

    /// Reads row-major JSON input. `fields` must be an array of strings.
    pub fn from_json(fields: &JsonValue, rows: &JsonValue) -> Result<Self> {
        let fields = fields
            .as_array()
            .ok_or_else(|| SqlscribeError::Type(ROWS_SHAPE_HINT.to_string()))?
            .iter()
            .map(|field| {
                field.as_str().map(str::to_string).ok_or_else(|| {
                    SqlscribeError::Type(format!("field names must be strings, got {}", field))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(InsertData::Rows {
            fields,
            rows: RowData::from_json(rows)?,
        })
    }

    /// Validates shapes and arities, returning field names and row data
    /// ready to be bound to an INSERT statement.
    pub fn validate(self) -> Result<(Vec<String>, RowData)> {
        match self {
            InsertData::Columnar(columns) => {
                let (fields, rows) = columns.into_rows()?;
                Ok((fields, RowData::Many(rows)))
            }
            InsertData::Rows { fields, rows } => {
                validate_rows(&fields, &rows)?;
                Ok((fields, rows))
            }
        }
    }
}

impl From<ColumnarData> for InsertData {
    fn from(columns: ColumnarData) -> Self {
        InsertData::Columnar(columns)
    }
}

/// Checks that every row carries exactly one value per field. For a batch,
/// every offending row is reported, one per line.
pub fn validate_rows(fields: &[String], rows: &RowData) -> Result<()> {
    if fields.is_empty() {
        return Err(SqlscribeError::Validation(
            "at least one field name is required".to_string(),
        ));
    }

    match rows {
        RowData::Single(row) if row.len() != fields.len() => Err(SqlscribeError::Value(format!(
            "each field must correspond with a single data point: {} field(s) and {} inputs",
            fields.len(),
            row.len()
        ))),
        RowData::Single(_) => Ok(()),
        RowData::Many(rows) => {
            let offending: Vec<String> = rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.len() != fields.len())
                .map(|(i, row)| format!("row {} has {} field(s) and {} inputs", i, fields.len(), row.len()))
                .collect();
            if offending.is_empty() {
                Ok(())
            } else {
                Err(SqlscribeError::Value(offending.join("\n")))
            }
        }
    }
}

fn json_scalar(value: &JsonValue) -> Result<Value> {
    match value {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        JsonValue::Number(n) if n.is_u64() && !n.is_i64() => Err(SqlscribeError::Type(format!(
            "integer {} does not fit in a signed 64-bit column value",
            n
        ))),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Real))
            .ok_or_else(|| SqlscribeError::Type(format!("unsupported number: {}", n))),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => Err(SqlscribeError::Type(format!(
            "row values must be scalars, got {}",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Integer).collect()
    }

    #[test]
    fn test_single_row_arity_mismatch() {
        let data = InsertData::rows(["age"], ints(&[9, 2]));
        match data.validate() {
            Err(SqlscribeError::Value(msg)) => {
                assert!(msg.contains("single data point"));
                assert!(msg.contains("1 field(s) and 2 inputs"));
            }
            other => panic!("Expected Value error, got {:?}", other),
        }
    }

    #[test]
    fn test_every_offending_row_is_reported() {
        let rows = vec![ints(&[9]), ints(&[2]), ints(&[12, 7]), ints(&[12, 12, 14])];
        let data = InsertData::rows(["age"], rows);
        match data.validate() {
            Err(SqlscribeError::Value(msg)) => assert_eq!(
                msg,
                "row 2 has 1 field(s) and 2 inputs\nrow 3 has 1 field(s) and 3 inputs"
            ),
            other => panic!("Expected Value error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_rows_pass_through() {
        let rows = vec![
            vec![Value::Integer(9), Value::Text("Tom".into())],
            vec![Value::Integer(10), Value::Text("Bob".into())],
        ];
        let (fields, data) = InsertData::rows(["age", "name"], rows.clone()).validate().unwrap();
        assert_eq!(fields, vec!["age", "name"]);
        assert_eq!(data, RowData::Many(rows));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let none: [&str; 0] = [];
        let data = InsertData::rows(none, Vec::<Vec<Value>>::new());
        assert!(matches!(data.validate(), Err(SqlscribeError::Validation(_))));
    }

    #[test]
    fn test_columnar_to_rows() {
        let columns = ColumnarData::new()
            .column("age", [9i64, 10, 11, 12])
            .column("name", ["Tom", "Bob", "Jack", "Yacin"].map(String::from));
        let (fields, rows) = columns.into_rows().unwrap();
        assert_eq!(fields, vec!["age", "name"]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3], vec![Value::Integer(12), Value::Text("Yacin".into())]);
    }

    #[test]
    fn test_columnar_length_mismatch() {
        let columns = ColumnarData::new().column("age", [9i64, 10]).column("name", [String::from("Tom")]);
        match columns.into_rows() {
            Err(SqlscribeError::Validation(msg)) => assert!(msg.contains("'name' has 1 value(s), expected 2")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert!(ColumnarData::new().into_rows().is_err());
    }

    #[test]
    fn test_rows_from_json_shapes() {
        assert_eq!(RowData::from_json(&json!([9, "Tom"])).unwrap(), RowData::Single(vec![
            Value::Integer(9),
            Value::Text("Tom".into())
        ]));
        assert_eq!(RowData::from_json(&json!([[1.5], [null]])).unwrap().row_count(), 2);
        assert_eq!(RowData::from_json(&json!([])).unwrap(), RowData::Many(Vec::new()));
    }

    #[test]
    fn test_rows_from_json_type_errors() {
        match RowData::from_json(&json!(9)) {
            Err(SqlscribeError::Type(msg)) => assert_eq!(msg, ROWS_SHAPE_HINT),
            other => panic!("Expected Type error, got {:?}", other),
        }
        match RowData::from_json(&json!([[9], 2])) {
            Err(SqlscribeError::Type(msg)) => assert_eq!(msg, DATA_SHAPE_HINT),
            other => panic!("Expected Type error, got {:?}", other),
        }
        assert!(matches!(RowData::from_json(&json!([[{"a": 1}]])), Err(SqlscribeError::Type(_))));
    }

    #[test]
    fn test_fields_from_json_must_be_sequence() {
        let result = InsertData::from_json(&json!("age"), &json!([9]));
        match result {
            Err(SqlscribeError::Type(msg)) => assert_eq!(msg, ROWS_SHAPE_HINT),
            other => panic!("Expected Type error, got {:?}", other),
        }
    }

    #[test]
    fn test_columnar_from_json() {
        let data = ColumnarData::from_json(&json!({"age": [9, 10], "name": ["Tom", "Bob"]})).unwrap();
        let (fields, rows) = data.into_rows().unwrap();
        assert_eq!(fields, vec!["age", "name"]);
        assert_eq!(rows[1], vec![Value::Integer(10), Value::Text("Bob".into())]);

        assert!(matches!(
            ColumnarData::from_json(&json!({"age": 9})),
            Err(SqlscribeError::Type(_))
        ));
    }

    #[test]
    fn test_columnar_from_json_keeps_key_order() {
        let value: JsonValue = serde_json::from_str(r#"{"name": ["Tom"], "age": [9]}"#).unwrap();
        let (fields, rows) = ColumnarData::from_json(&value).unwrap().into_rows().unwrap();
        assert_eq!(fields, vec!["name", "age"]);
        assert_eq!(rows, vec![vec![Value::Text("Tom".into()), Value::Integer(9)]]);
    }

    #[test]
    fn test_json_integers_beyond_i64_rejected() {
        let value: JsonValue = serde_json::from_str("[18446744073709551615]").unwrap();
        match RowData::from_json(&value) {
            Err(SqlscribeError::Type(msg)) => assert!(msg.contains("18446744073709551615")),
            other => panic!("Expected Type error, got {:?}", other),
        }
        let value: JsonValue = serde_json::from_str("[9223372036854775807, -1, 2.5]").unwrap();
        assert_eq!(
            RowData::from_json(&value).unwrap(),
            RowData::Single(vec![Value::Integer(i64::MAX), Value::Integer(-1), Value::Real(2.5)])
        );
    }
}
