//! Literal rendering of parameter values.
//!
//! Executed statements always bind their parameters through the driver. These literals are
//! only used to show a statement the way it would read with values inlined, for logs and for
//! comparing builder output. No quote escaping is performed.
//!
//! [`text_form`] is also what a non-text value binds as when a Postgres text column
//! receives it.

use std::fmt::Write;

use crate::types::RowValues;

/// Render a value as a SQL literal.
///
/// ```rust
/// use easy_sql::encoding::encode_literal;
/// use easy_sql::prelude::RowValues;
///
/// assert_eq!(encode_literal(&RowValues::Text("x".into())), "'x'");
/// assert_eq!(encode_literal(&RowValues::Int(5)), "5");
/// assert_eq!(encode_literal(&RowValues::Null), "null");
/// ```
#[must_use]
pub fn encode_literal(value: &RowValues) -> String {
    match value {
        RowValues::Int(_) | RowValues::Float(_) | RowValues::Null => {
            text_form(value).unwrap_or_else(|| "null".to_string())
        }
        _ => text_form(value).map_or_else(|| "null".to_string(), |text| quoted(&text)),
    }
}

/// The value as plain text, without quotes; `None` for NULL.
///
/// Structured values are compact JSON, timestamps `%F %T%.f`, blobs lowercase hex.
#[must_use]
pub fn text_form(value: &RowValues) -> Option<String> {
    Some(match value {
        RowValues::Text(s) => s.clone(),
        RowValues::Int(i) => i.to_string(),
        RowValues::Float(f) => f.to_string(),
        RowValues::Null => return None,
        RowValues::JSON(v) => v.to_string(),
        RowValues::Bool(b) => b.to_string(),
        RowValues::Timestamp(dt) => dt.format("%F %T%.f").to_string(),
        RowValues::Blob(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2);
            for b in bytes {
                // writing into a String cannot fail
                let _ = write!(hex, "{b:02x}");
            }
            hex
        }
    })
}

fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    out.push_str(s);
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn text_is_quoted_without_escaping() {
        for s in ["", "plain", "it's", "a'b'c", "multi\nline", "ünïcode"] {
            assert_eq!(
                encode_literal(&RowValues::Text(s.to_string())),
                format!("'{s}'")
            );
        }
    }

    #[test]
    fn numbers_are_bare() {
        for n in [0_i64, -3, 42, i64::MAX] {
            assert_eq!(encode_literal(&RowValues::Int(n)), n.to_string());
        }
        assert_eq!(encode_literal(&RowValues::Float(1.5)), "1.5");
        assert_eq!(encode_literal(&RowValues::Float(2.0)), "2");
        assert!(!encode_literal(&RowValues::Float(-0.25)).contains('\''));
    }

    #[test]
    fn null_is_bare_token() {
        assert_eq!(encode_literal(&RowValues::Null), "null");
    }

    #[test]
    fn structured_values_are_quoted_json() {
        let v = json!({"a": [1, "b"], "c": null});
        assert_eq!(
            encode_literal(&RowValues::JSON(v)),
            r#"'{"a":[1,"b"],"c":null}'"#
        );
    }

    #[test]
    fn other_values_are_stringified_and_quoted() {
        assert_eq!(encode_literal(&RowValues::Bool(true)), "'true'");
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            encode_literal(&RowValues::Timestamp(dt)),
            "'2024-01-02 03:04:05'"
        );
        assert_eq!(encode_literal(&RowValues::Blob(vec![0, 255, 16])), "'00ff10'");
    }
}
