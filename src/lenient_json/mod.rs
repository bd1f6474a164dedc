//! Relaxed object-literal parsing for data mappings supplied as text.
//!
//! Accepts everything strict JSON accepts plus single-quoted strings and bare or
//! single-quoted object keys, so `{name: 'x:y', 'age': 3}` parses. Everything else
//! (comments, trailing commas, bare string values) is rejected.

use std::str::FromStr;

use serde_json::{Map, Number, Value};

use crate::error::EasySqlError;

mod scanner;

use scanner::{Scanner, is_word_char};

const MAX_DEPTH: usize = 128;

/// Parse lenient object text into an ordered JSON map.
///
/// # Errors
/// Returns `EasySqlError::ParseError` with the byte offset of the problem when the text is
/// not a single object literal.
///
/// ```rust
/// use easy_sql::lenient_json::parse_lenient;
/// use serde_json::json;
///
/// let map = parse_lenient("{a: 'x:y', b: 1}").unwrap();
/// assert_eq!(serde_json::Value::Object(map), json!({"a": "x:y", "b": 1}));
/// ```
pub fn parse_lenient(text: &str) -> Result<Map<String, Value>, EasySqlError> {
    let mut scanner = Scanner::new(text);
    scanner.skip_whitespace();
    if scanner.peek() != Some('{') {
        return Err(scanner.error("expected an object literal"));
    }
    let value = parse_value(&mut scanner, 0)?;
    scanner.skip_whitespace();
    if !scanner.at_end() {
        return Err(scanner.error("unexpected trailing characters"));
    }
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(EasySqlError::parse("expected an object literal", 0)),
    }
}

fn parse_value(scanner: &mut Scanner<'_>, depth: usize) -> Result<Value, EasySqlError> {
    if depth > MAX_DEPTH {
        return Err(scanner.error("nesting too deep"));
    }
    scanner.skip_whitespace();
    match scanner.peek() {
        Some('{') => {
            scanner.bump();
            parse_object(scanner, depth + 1).map(Value::Object)
        }
        Some('[') => {
            scanner.bump();
            parse_array(scanner, depth + 1).map(Value::Array)
        }
        Some(q @ ('"' | '\'')) => {
            scanner.bump();
            scanner.quoted(q).map(Value::String)
        }
        Some(c) if c == '-' || c.is_ascii_digit() => parse_number(scanner),
        Some(c) if is_word_char(c) => {
            let start = scanner.pos();
            match scanner.bare_word() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                word => Err(EasySqlError::parse(
                    format!("unexpected bare word '{word}'"),
                    start,
                )),
            }
        }
        Some(c) => Err(scanner.error(format!("unexpected character '{c}'"))),
        None => Err(scanner.error("unexpected end of input")),
    }
}

fn parse_object(
    scanner: &mut Scanner<'_>,
    depth: usize,
) -> Result<Map<String, Value>, EasySqlError> {
    let mut map = Map::new();
    scanner.skip_whitespace();
    if scanner.peek() == Some('}') {
        scanner.bump();
        return Ok(map);
    }
    loop {
        let key = parse_key(scanner)?;
        scanner.expect(':')?;
        let value = parse_value(scanner, depth)?;
        map.insert(key, value);

        scanner.skip_whitespace();
        match scanner.bump() {
            Some(',') => {}
            Some('}') => return Ok(map),
            Some(c) => return Err(scanner.error(format!("expected ',' or '}}', found '{c}'"))),
            None => return Err(scanner.error("unterminated object")),
        }
    }
}

fn parse_key(scanner: &mut Scanner<'_>) -> Result<String, EasySqlError> {
    scanner.skip_whitespace();
    match scanner.peek() {
        Some(q @ ('"' | '\'')) => {
            scanner.bump();
            scanner.quoted(q)
        }
        Some(c) if is_word_char(c) => Ok(scanner.bare_word().to_string()),
        Some(c) => Err(scanner.error(format!("expected an object key, found '{c}'"))),
        None => Err(scanner.error("unterminated object")),
    }
}

fn parse_array(scanner: &mut Scanner<'_>, depth: usize) -> Result<Vec<Value>, EasySqlError> {
    let mut items = Vec::new();
    scanner.skip_whitespace();
    if scanner.peek() == Some(']') {
        scanner.bump();
        return Ok(items);
    }
    loop {
        items.push(parse_value(scanner, depth)?);
        scanner.skip_whitespace();
        match scanner.bump() {
            Some(',') => {}
            Some(']') => return Ok(items),
            Some(c) => return Err(scanner.error(format!("expected ',' or ']', found '{c}'"))),
            None => return Err(scanner.error("unterminated array")),
        }
    }
}

fn parse_number(scanner: &mut Scanner<'_>) -> Result<Value, EasySqlError> {
    let start = scanner.pos();
    let text = scanner.number_text();
    Number::from_str(text)
        .map(Value::Number)
        .map_err(|_| EasySqlError::parse(format!("invalid number '{text}'"), start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(text: &str) -> Value {
        Value::Object(parse_lenient(text).unwrap())
    }

    #[test]
    fn colon_inside_single_quoted_value_survives() {
        assert_eq!(parsed("{a: 'x:y', b: 1}"), json!({"a": "x:y", "b": 1}));
    }

    #[test]
    fn strict_json_still_parses() {
        let text = r#"{"name": "bob", "tags": ["a", "b"], "n": -1.5e2, "ok": true, "z": null}"#;
        assert_eq!(parsed(text), serde_json::from_str::<Value>(text).unwrap());
    }

    #[test]
    fn mixed_key_styles() {
        assert_eq!(
            parsed(r#"{'single': 1, "double": 2, bare_key: 3, $dollar: 4}"#),
            json!({"single": 1, "double": 2, "bare_key": 3, "$dollar": 4})
        );
    }

    #[test]
    fn structural_characters_inside_strings() {
        assert_eq!(
            parsed(r#"{sql: 'a, b: {c}', url: "http://x:80/[p]"}"#),
            json!({"sql": "a, b: {c}", "url": "http://x:80/[p]"})
        );
    }

    #[test]
    fn escapes_in_both_quote_styles() {
        assert_eq!(
            parsed(r#"{a: 'it\'s', b: "say \"hi\"", c: 'é\n'}"#),
            json!({"a": "it's", "b": "say \"hi\"", "c": "é\n"})
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let map = parse_lenient("{z: 1, a: 2, m: 3}").unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn nested_structures() {
        assert_eq!(
            parsed("{outer: {inner: ['x', {deep: false}]}, empty: {}, none: []}"),
            json!({"outer": {"inner": ["x", {"deep": false}]}, "empty": {}, "none": []})
        );
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "",
            "[1, 2]",
            "{a: 1,}",
            "{a 1}",
            "{a: 'open}",
            "{a: bareword}",
            "{a: 1} trailing",
            "{a: 01x}",
            "{: 1}",
            r#"{a: "\u+041"}"#,
            r#"{a: "\u-041"}"#,
            r#"{a: "\u 41a"}"#,
        ] {
            assert!(
                matches!(parse_lenient(bad), Err(EasySqlError::ParseError { .. })),
                "expected parse error for {bad:?}"
            );
        }
    }

    #[test]
    fn error_reports_position() {
        let Err(EasySqlError::ParseError { position, .. }) = parse_lenient("{a: 1, b: ?}") else {
            panic!("expected parse error");
        };
        assert_eq!(position, 10);
    }
}
