use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::EasySqlError;

/// Values bound as statement parameters or read back from a row.
///
/// Data-mapping values convert with [`RowValues::from_json`]:
/// ```rust
/// use easy_sql::prelude::*;
/// use serde_json::json;
///
/// assert_eq!(RowValues::from_json(&json!(7))?, RowValues::Int(7));
/// assert_eq!(RowValues::from_json(&json!("x"))?, RowValues::Text("x".into()));
/// assert_eq!(RowValues::from_json(&json!(null))?, RowValues::Null);
/// # Ok::<(), EasySqlError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// Structured value (array or object)
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Convert one value of a data mapping.
    ///
    /// Integral numbers become `Int`, every other number `Float`; arrays and objects are
    /// kept whole as `JSON`.
    ///
    /// # Errors
    /// `BuildError` for integers above `i64::MAX`, which no column value can hold exactly.
    pub fn from_json(value: &JsonValue) -> Result<Self, EasySqlError> {
        Ok(match value {
            JsonValue::Null => RowValues::Null,
            JsonValue::Bool(b) => RowValues::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RowValues::Int(i)
                } else if n.is_u64() {
                    return Err(EasySqlError::BuildError(format!(
                        "integer {n} does not fit in a signed 64-bit value"
                    )));
                } else {
                    RowValues::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => RowValues::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => RowValues::JSON(value.clone()),
        })
    }

    /// Convert back to JSON, the shape rows take when handed to callers as objects.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => JsonValue::String(dt.format("%F %T%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(v) => v.clone(),
            RowValues::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
        }
    }

    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }
}

impl TryFrom<&JsonValue> for RowValues {
    type Error = EasySqlError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        RowValues::from_json(value)
    }
}

/// Turn an ordered data mapping into column/value pairs, keeping map order.
pub(crate) fn map_to_row_values(
    map: &Map<String, JsonValue>,
) -> Result<Vec<(String, RowValues)>, EasySqlError> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), RowValues::from_json(v)?)))
        .collect()
}

/// The database type a configuration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    #[cfg(feature = "postgres")]
    Postgres,
    /// `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_split_into_int_and_float() {
        assert_eq!(RowValues::from_json(&json!(3)).unwrap(), RowValues::Int(3));
        assert_eq!(RowValues::from_json(&json!(2.5)).unwrap(), RowValues::Float(2.5));
        assert_eq!(RowValues::from_json(&json!(true)).unwrap(), RowValues::Bool(true));
        assert_eq!(
            RowValues::from_json(&json!(i64::MIN)).unwrap(),
            RowValues::Int(i64::MIN)
        );
    }

    #[test]
    fn structured_values_stay_whole() {
        let nested = json!({"k": [1, 2]});
        assert_eq!(RowValues::from_json(&nested).unwrap(), RowValues::JSON(nested.clone()));
        assert_eq!(RowValues::JSON(nested.clone()).to_json(), nested);
    }

    #[test]
    fn integers_past_i64_are_rejected() {
        let big = json!(u64::MAX);
        assert!(matches!(
            RowValues::from_json(&big),
            Err(EasySqlError::BuildError(msg)) if msg.contains("18446744073709551615")
        ));
        assert!(map_to_row_values(json!({"n": u64::MAX}).as_object().unwrap()).is_err());
    }

    #[test]
    fn map_order_is_kept() {
        let data = json!({"z": 1, "a": "x"});
        let map = data.as_object().unwrap();
        let cols: Vec<String> = map_to_row_values(map).unwrap().into_iter().map(|(c, _)| c).collect();
        assert_eq!(cols, vec!["z", "a"]);
    }
}
