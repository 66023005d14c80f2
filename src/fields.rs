//! Table field descriptions and their normalization.
//!
//! Callers describe columns either as ordered tuples `(name, type[, extra])`
//! or as records keyed by `field`, `data_type` and `extra`. Both shapes are
//! normalized into [`FieldSpec`] before a CREATE TABLE statement is rendered.
use crate::core::{Result, SqlscribeError};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keys accepted in a field record.
pub const RECORD_KEYS: [&str; 3] = ["field", "data_type", "extra"];

const SHAPE_HINT: &str = "fields must be a list of records like [{\"field\": _, \"data_type\": _, \"extra\": _}, ...] \
or a list of tuples like [(\"field\", \"data_type\", \"extra\"), ...]";

/// SQLite storage classes accepted as column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl DataType {
    pub const ALL: [DataType; 5] = [
        DataType::Null,
        DataType::Integer,
        DataType::Real,
        DataType::Text,
        DataType::Blob,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Null => "NULL",
            DataType::Integer => "INTEGER",
            DataType::Real => "REAL",
            DataType::Text => "TEXT",
            DataType::Blob => "BLOB",
        }
    }

    fn allowed() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(DataType::as_str).collect();
        format!("({})", names.join(", "))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SqlscribeError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        DataType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == upper)
            .ok_or_else(|| {
                SqlscribeError::Validation(format!(
                    "data_type must be one of {}, got '{}'",
                    DataType::allowed(),
                    s
                ))
            })
    }
}

/// One table column: name, storage class and an optional trailing clause
/// such as `NOT NULL` or `PRIMARY KEY`.
///
/// Only [`FieldSpec::new`] builds one, so the name is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    data_type: DataType,
    extra: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SqlscribeError::Validation(
                "field name must not be empty".to_string(),
            ));
        }
        Ok(FieldSpec {
            name,
            data_type,
            extra: None,
        })
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        let extra = extra.into();
        self.extra = if extra.trim().is_empty() { None } else { Some(extra) };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }
}

/// Caller-supplied field descriptions, in one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// `(name, type)` or `(name, type, extra)` tuples
    Tuples(Vec<Vec<String>>),
    /// Records keyed by `field`, `data_type` and optionally `extra`
    Records(Vec<BTreeMap<String, String>>),
}

impl FieldInput {
    /// Builds tuple-shaped input.
    ///
    /// ```
    /// use sqlscribe::fields::FieldInput;
    /// let input = FieldInput::tuples([vec!["id", "INTEGER"], vec!["name", "TEXT", "NOT NULL"]]);
    /// assert_eq!(input.normalize().unwrap().len(), 2);
    /// ```
    pub fn tuples<I, T, S>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldInput::Tuples(
            items
                .into_iter()
                .map(|item| item.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Builds record-shaped input from key/value pairs.
    pub fn records<I, R, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        FieldInput::Records(
            items
                .into_iter()
                .map(|record| {
                    record
                        .into_iter()
                        .map(|(k, v)| (k.into(), v.into()))
                        .collect()
                })
                .collect(),
        )
    }

    /// Interprets a JSON array as field input: an array of arrays of strings
    /// is tuple-shaped, an array of objects with string values is record-shaped.
    /// Anything else, including a mix of the two, is a `Type` error.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| SqlscribeError::Type(SHAPE_HINT.to_string()))?;

        if items.iter().all(JsonValue::is_array) {
            let tuples = items
                .iter()
                .map(|item| {
                    item.as_array()
                        .into_iter()
                        .flatten()
                        .map(json_string)
                        .collect::<Result<Vec<String>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(FieldInput::Tuples(tuples));
        }

        if items.iter().all(JsonValue::is_object) {
            let records = items
                .iter()
                .filter_map(JsonValue::as_object)
                .map(|object| {
                    object
                        .iter()
                        .map(|(key, value)| Ok((key.clone(), json_string(value)?)))
                        .collect::<Result<BTreeMap<String, String>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(FieldInput::Records(records));
        }

        Err(SqlscribeError::Type(SHAPE_HINT.to_string()))
    }

    /// Validates the input and produces canonical field specs in the order given.
    pub fn normalize(&self) -> Result<Vec<FieldSpec>> {
        match self {
            FieldInput::Tuples(tuples) => tuples.iter().map(|t| from_tuple(t)).collect(),
            FieldInput::Records(records) => records.iter().map(from_record).collect(),
        }
    }
}

impl From<Vec<FieldSpec>> for FieldInput {
    fn from(specs: Vec<FieldSpec>) -> Self {
        FieldInput::Tuples(
            specs
                .into_iter()
                .map(|spec| {
                    let mut tuple = vec![spec.name, spec.data_type.to_string()];
                    tuple.extend(spec.extra);
                    tuple
                })
                .collect(),
        )
    }
}

fn from_tuple(tuple: &[String]) -> Result<FieldSpec> {
    match tuple {
        [name, data_type] => FieldSpec::new(name.as_str(), data_type.parse()?),
        [name, data_type, extra] => {
            Ok(FieldSpec::new(name.as_str(), data_type.parse()?)?.with_extra(extra.as_str()))
        }
        _ => Err(SqlscribeError::Validation(format!(
            "each tuple must contain 2-3 elements (field, data_type, extra), got {}",
            tuple.len()
        ))),
    }
}

fn from_record(record: &BTreeMap<String, String>) -> Result<FieldSpec> {
    if let Some(key) = record.keys().find(|key| !RECORD_KEYS.contains(&key.as_str())) {
        return Err(SqlscribeError::Validation(format!(
            "unknown key: {}. must be either field, data_type, or extra",
            key
        )));
    }

    let name = record
        .get("field")
        .ok_or_else(|| SqlscribeError::Validation("missing key: field".to_string()))?;
    let data_type = record
        .get("data_type")
        .ok_or_else(|| SqlscribeError::Validation("missing key: data_type".to_string()))?;

    let spec = FieldSpec::new(name.as_str(), data_type.parse()?)?;
    Ok(match record.get("extra") {
        Some(extra) => spec.with_extra(extra.as_str()),
        None => spec,
    })
}

fn json_string(value: &JsonValue) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SqlscribeError::Type(format!("expected a string, got {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_type_is_case_insensitive() {
        assert_eq!("integer".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("Blob".parse::<DataType>().unwrap(), DataType::Blob);
        assert_eq!(" TEXT ".parse::<DataType>().unwrap(), DataType::Text);
    }

    #[test]
    fn test_unknown_data_type_lists_allowed_set() {
        let err = "VARCHAR".parse::<DataType>().unwrap_err();
        match err {
            SqlscribeError::Validation(msg) => {
                assert!(msg.contains("(NULL, INTEGER, REAL, TEXT, BLOB)"));
                assert!(msg.contains("VARCHAR"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_tuples_normalize_with_and_without_extra() {
        let input = FieldInput::tuples([vec!["id", "INTEGER"], vec!["name", "text", "NOT NULL"]]);
        let specs = input.normalize().unwrap();
        assert_eq!(specs[0], FieldSpec::new("id", DataType::Integer).unwrap());
        assert_eq!(specs[1].name, "name");
        assert_eq!(specs[1].data_type, DataType::Text);
        assert_eq!(specs[1].extra.as_deref(), Some("NOT NULL"));
    }

    #[test]
    fn test_tuple_with_wrong_arity_fails() {
        let input = FieldInput::tuples([vec!["id"]]);
        assert!(matches!(input.normalize(), Err(SqlscribeError::Validation(_))));

        let input = FieldInput::tuples([vec!["id", "INTEGER", "NOT NULL", "UNIQUE"]]);
        match input.normalize() {
            Err(SqlscribeError::Validation(msg)) => assert!(msg.contains("2-3 elements")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_records_normalize() {
        let input = FieldInput::records([
            vec![("field", "id"), ("data_type", "INTEGER"), ("extra", "NOT NULL")],
            vec![("field", "age"), ("data_type", "integer")],
        ]);
        let specs = input.normalize().unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].extra.as_deref(), Some("NOT NULL"));
        assert_eq!(specs[1].data_type, DataType::Integer);
        assert_eq!(specs[1].extra, None);
    }

    #[test]
    fn test_record_with_unknown_key_names_it() {
        let input = FieldInput::records([vec![("field", "id"), ("data_type", "INTEGER"), ("size", "4")]]);
        match input.normalize() {
            Err(SqlscribeError::Validation(msg)) => assert!(msg.contains("unknown key: size")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_with_bad_data_type() {
        let input = FieldInput::records([vec![("field", "id"), ("data_type", "NUMBER")]]);
        assert!(matches!(input.normalize(), Err(SqlscribeError::Validation(_))));
    }

    #[test]
    fn test_record_missing_required_key() {
        let input = FieldInput::records([vec![("data_type", "INTEGER")]]);
        match input.normalize() {
            Err(SqlscribeError::Validation(msg)) => assert_eq!(msg, "missing key: field"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_field_name_rejected() {
        assert!(FieldSpec::new("  ", DataType::Text).is_err());
        let input = FieldInput::tuples([vec!["", "TEXT"]]);
        assert!(input.normalize().is_err());
    }

    #[test]
    fn test_from_json_tuples_and_records() {
        let tuples = FieldInput::from_json(&json!([["id", "INTEGER"], ["name", "TEXT", "NOT NULL"]])).unwrap();
        assert!(matches!(tuples, FieldInput::Tuples(ref t) if t.len() == 2));

        let records = FieldInput::from_json(&json!([{"field": "id", "data_type": "INTEGER"}])).unwrap();
        assert_eq!(records.normalize().unwrap()[0].name, "id");
    }

    #[test]
    fn test_from_json_rejects_mixed_shapes() {
        let mixed = json!([["id", "INTEGER"], {"field": "age", "data_type": "INTEGER"}]);
        match FieldInput::from_json(&mixed) {
            Err(SqlscribeError::Type(msg)) => {
                assert!(msg.contains("list of records"));
                assert!(msg.contains("list of tuples"));
            }
            other => panic!("Expected Type error, got {:?}", other),
        }
        assert!(matches!(FieldInput::from_json(&json!("id")), Err(SqlscribeError::Type(_))));
        assert!(matches!(FieldInput::from_json(&json!([["id", 1]])), Err(SqlscribeError::Type(_))));
    }

    #[test]
    fn test_specs_convert_back_to_input() {
        let specs = vec![
            FieldSpec::new("id", DataType::Integer).unwrap().with_extra("PRIMARY KEY"),
            FieldSpec::new("body", DataType::Blob).unwrap(),
        ];
        let input = FieldInput::from(specs.clone());
        assert_eq!(input.normalize().unwrap(), specs);
    }
}
