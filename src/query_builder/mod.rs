use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::error::EasySqlError;
use crate::lenient_json::parse_lenient;
use crate::translation::inline_placeholders;
use crate::types::RowValues;

mod dml;

pub use dml::{build_delete, build_insert, build_update};

/// A SQL template with `?1..?N` placeholders and the values bound to them.
///
/// ```rust
/// use easy_sql::prelude::*;
///
/// let stmt = Statement::new("SELECT * FROM t WHERE id = ?1").with_params(vec![RowValues::Int(5)]);
/// assert_eq!(stmt.render(), "SELECT * FROM t WHERE id = 5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<RowValues>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<RowValues>) -> Self {
        self.params = params;
        self
    }

    /// The statement with every bound value inlined as a literal.
    ///
    /// Meant for logs and comparisons only; values are not escaped.
    #[must_use]
    pub fn render(&self) -> Cow<'_, str> {
        inline_placeholders(&self.sql, &self.params)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Statement {
    fn from(sql: &str) -> Self {
        Statement::new(sql)
    }
}

impl From<String> for Statement {
    fn from(sql: String) -> Self {
        Statement::new(sql)
    }
}

/// Column data handed to the statement builders.
///
/// Text goes through [`parse_lenient`], so callers can pass `"{name: 'bob', age: 3}"`.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    Map(&'a Map<String, JsonValue>),
    Value(&'a JsonValue),
    Text(&'a str),
}

impl<'a> Record<'a> {
    /// Resolve to an ordered column map.
    ///
    /// # Errors
    /// `ParseError` for malformed text, `BuildError` for values that are not objects.
    pub fn resolve(self) -> Result<Cow<'a, Map<String, JsonValue>>, EasySqlError> {
        match self {
            Record::Map(map) => Ok(Cow::Borrowed(map)),
            Record::Value(JsonValue::Object(map)) => Ok(Cow::Borrowed(map)),
            Record::Value(JsonValue::String(text)) => parse_lenient(text).map(Cow::Owned),
            Record::Text(text) => parse_lenient(text).map(Cow::Owned),
            Record::Value(other) => Err(EasySqlError::BuildError(format!(
                "record data must be an object, got {}",
                json_kind(other)
            ))),
        }
    }
}

impl<'a> From<&'a Map<String, JsonValue>> for Record<'a> {
    fn from(map: &'a Map<String, JsonValue>) -> Self {
        Record::Map(map)
    }
}

impl<'a> From<&'a JsonValue> for Record<'a> {
    fn from(value: &'a JsonValue) -> Self {
        Record::Value(value)
    }
}

impl<'a> From<&'a str> for Record<'a> {
    fn from(text: &'a str) -> Self {
        Record::Text(text)
    }
}

impl<'a> From<&'a String> for Record<'a> {
    fn from(text: &'a String) -> Self {
        Record::Text(text)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statement_from_raw_sql_has_no_params() {
        let stmt: Statement = "DELETE FROM t".into();
        assert!(stmt.params.is_empty());
        assert_eq!(stmt.to_string(), "DELETE FROM t");
    }

    #[test]
    fn record_resolution() {
        let obj = json!({"a": 1});
        assert_eq!(Record::from(&obj).resolve().unwrap().len(), 1);

        let text = json!("{b: 'two'}");
        let resolved = Record::from(&text).resolve().unwrap();
        assert_eq!(resolved.get("b"), Some(&json!("two")));

        let arr = json!([1, 2]);
        assert!(matches!(
            Record::from(&arr).resolve(),
            Err(EasySqlError::BuildError(_))
        ));
        assert!(matches!(
            Record::from("{oops").resolve(),
            Err(EasySqlError::ParseError { .. })
        ));
    }
}
