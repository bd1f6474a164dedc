use std::fmt::Write;

use serde_json::{Map, Value as JsonValue};

use super::{Record, Statement};
use crate::error::EasySqlError;
use crate::types::{RowValues, map_to_row_values};

/// Build `INSERT INTO <table> (<cols>) VALUES (?1,..);`.
///
/// With a whitelist only the listed columns present in `data` are used, in whitelist
/// order; otherwise every key of `data` in map order.
///
/// # Errors
/// `ParseError` when text data is malformed, `BuildError` when no column remains.
///
/// ```rust
/// use easy_sql::query_builder::build_insert;
/// use serde_json::json;
///
/// let stmt = build_insert("t", &json!({"a": 1, "b": "x"}), None).unwrap();
/// assert_eq!(stmt.sql, "INSERT INTO t (a,b) VALUES (?1,?2);");
/// assert_eq!(stmt.render(), "INSERT INTO t (a,b) VALUES (1,'x');");
/// ```
pub fn build_insert<'a>(
    table: &str,
    data: impl Into<Record<'a>>,
    columns: Option<&[&str]>,
) -> Result<Statement, EasySqlError> {
    let map = data.into().resolve()?;
    let pairs = select_columns(&map, columns, table)?;

    let mut cols = String::new();
    let mut placeholders = String::new();
    let mut params = Vec::with_capacity(pairs.len());
    for (idx, (column, value)) in pairs.into_iter().enumerate() {
        if idx > 0 {
            cols.push(',');
            placeholders.push(',');
        }
        cols.push_str(&column);
        // writing into a String cannot fail
        let _ = write!(placeholders, "?{}", idx + 1);
        params.push(value);
    }

    Ok(Statement {
        sql: format!("INSERT INTO {table} ({cols}) VALUES ({placeholders});"),
        params,
    })
}

/// Build `UPDATE <table> SET <col>=?1,.. WHERE <where_clause>`.
///
/// `where_clause` is raw SQL and is appended as given. Column selection follows
/// [`build_insert`].
///
/// # Errors
/// `ParseError` when text data is malformed, `BuildError` when no column remains.
pub fn build_update<'a>(
    table: &str,
    data: impl Into<Record<'a>>,
    where_clause: &str,
    columns: Option<&[&str]>,
) -> Result<Statement, EasySqlError> {
    let map = data.into().resolve()?;
    let pairs = select_columns(&map, columns, table)?;

    let mut assignments = String::new();
    let mut params = Vec::with_capacity(pairs.len());
    for (idx, (column, value)) in pairs.into_iter().enumerate() {
        if idx > 0 {
            assignments.push(',');
        }
        let _ = write!(assignments, "{column}=?{}", idx + 1);
        params.push(value);
    }

    Ok(Statement {
        sql: format!("UPDATE {table} SET {assignments} WHERE {where_clause}"),
        params,
    })
}

/// Build `DELETE FROM <table> WHERE <where_clause>;`.
#[must_use]
pub fn build_delete(table: &str, where_clause: &str) -> Statement {
    Statement::new(format!("DELETE FROM {table} WHERE {where_clause};"))
}

fn select_columns(
    map: &Map<String, JsonValue>,
    columns: Option<&[&str]>,
    table: &str,
) -> Result<Vec<(String, RowValues)>, EasySqlError> {
    let pairs: Vec<(String, RowValues)> = match columns {
        Some(allowed) => allowed
            .iter()
            .filter_map(|col| map.get(*col).map(|v| (*col, v)))
            .map(|(col, v)| Ok((col.to_string(), RowValues::from_json(v)?)))
            .collect::<Result<_, EasySqlError>>()?,
        None => map_to_row_values(map)?,
    };
    if pairs.is_empty() {
        return Err(EasySqlError::BuildError(format!(
            "no columns to write for table {table}"
        )));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_all_columns_in_map_order() {
        let stmt = build_insert("t", &json!({"a": 1, "b": "x"}), None).unwrap();
        assert_eq!(stmt.render(), "INSERT INTO t (a,b) VALUES (1,'x');");
        assert_eq!(
            stmt.params,
            vec![RowValues::Int(1), RowValues::Text("x".into())]
        );
    }

    #[test]
    fn insert_whitelist_filters_and_orders() {
        let data = json!({"a": 1, "b": 2, "c": 3});
        let only_a = build_insert("t", &data, Some(["a"].as_slice())).unwrap();
        assert_eq!(only_a.render(), "INSERT INTO t (a) VALUES (1);");

        let reordered = build_insert("t", &data, Some(["c", "missing", "a"].as_slice())).unwrap();
        assert_eq!(reordered.sql, "INSERT INTO t (c,a) VALUES (?1,?2);");
        assert_eq!(reordered.render(), "INSERT INTO t (c,a) VALUES (3,1);");
    }

    #[test]
    fn update_with_and_without_whitelist() {
        let stmt = build_update("t", &json!({"a": 1}), "id=5", None).unwrap();
        assert_eq!(stmt.sql, "UPDATE t SET a=?1 WHERE id=5");
        assert_eq!(stmt.render(), "UPDATE t SET a=1 WHERE id=5");

        let data = json!({"name": "bob", "role": "admin", "age": null});
        let stmt = build_update("users", &data, "id = 7", Some(["age", "name"].as_slice())).unwrap();
        assert_eq!(stmt.render(), "UPDATE users SET age=null,name='bob' WHERE id = 7");
    }

    #[test]
    fn delete_has_no_params() {
        let stmt = build_delete("t", "id=5");
        assert_eq!(stmt.sql, "DELETE FROM t WHERE id=5;");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn text_data_goes_through_lenient_parser() {
        let stmt = build_insert("t", "{a: 'x:y', b: 1}", None).unwrap();
        assert_eq!(stmt.render(), "INSERT INTO t (a,b) VALUES ('x:y',1);");

        let err = build_update("t", "{a: ", "id=1", None).unwrap_err();
        assert!(matches!(err, EasySqlError::ParseError { .. }));
    }

    #[test]
    fn nested_values_bind_as_json() {
        let stmt = build_insert("t", &json!({"meta": {"k": [1]}, "flag": false}), None).unwrap();
        assert_eq!(
            stmt.render(),
            r#"INSERT INTO t (meta,flag) VALUES ('{"k":[1]}','false');"#
        );
    }

    #[test]
    fn oversized_integers_fail_the_build() {
        let err = build_insert("t", &json!({"n": u64::MAX}), None).unwrap_err();
        assert!(matches!(err, EasySqlError::BuildError(_)));
    }

    #[test]
    fn empty_column_set_fails_fast() {
        assert!(matches!(
            build_insert("t", &json!({}), None),
            Err(EasySqlError::BuildError(_))
        ));
        assert!(matches!(
            build_update("t", &json!({"a": 1}), "id=1", Some(["b"].as_slice())),
            Err(EasySqlError::BuildError(_))
        ));
    }
}
