use std::borrow::Cow;

mod scanner;

use scanner::{
    State, is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    scan_digits, try_start_dollar_quote,
};

use crate::encoding::encode_literal;
use crate::types::RowValues;

/// Rewrite SQLite-style `?N` placeholders to Postgres-style `$N`.
///
/// Quoted strings, comments, and dollar-quoted blocks are skipped via a lightweight state
/// machine, so a `?` inside them is left alone. Returns a borrowed `Cow`
/// when no changes are needed.
#[must_use]
pub fn translate_placeholders(sql: &str) -> Cow<'_, str> {
    rewrite_placeholders(sql, |marker, digits| {
        (marker == b'?').then(|| format!("${digits}"))
    })
}

/// Replace `?N` placeholders with the literal rendering of `params[N - 1]`.
///
/// Placeholders without a matching parameter are left untouched.
#[must_use]
pub fn inline_placeholders<'a>(sql: &'a str, params: &[RowValues]) -> Cow<'a, str> {
    if params.is_empty() {
        return Cow::Borrowed(sql);
    }
    rewrite_placeholders(sql, |marker, digits| {
        if marker != b'?' {
            return None;
        }
        let idx = digits.parse::<usize>().ok()?.checked_sub(1)?;
        params.get(idx).map(encode_literal)
    })
}

/// Walk `sql` and let `replace` substitute each numbered placeholder found outside literals
/// and comments. `replace` receives the marker byte (`?` or `$`) and the digit run.
fn rewrite_placeholders<F>(sql: &str, mut replace: F) -> Cow<'_, str>
where
    F: FnMut(u8, &str) -> Option<String>,
{
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut idx = 0;
    let mut copied_to = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => state = State::BlockComment(1),
                b'$' | b'?' => {
                    if b == b'$'
                        && let Some((tag, advance)) = try_start_dollar_quote(bytes, idx)
                    {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    } else if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1)
                        && let Some(replacement) = replace(b, digits)
                    {
                        let buf = out.get_or_insert_with(String::new);
                        buf.push_str(&sql[copied_to..idx]);
                        buf.push_str(&replacement);
                        copied_to = digits_end;
                        idx = digits_end;
                        continue;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                } else if is_block_comment_end(bytes, idx) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let tag_len = tag.len();
                    state = State::Normal;
                    idx += tag_len;
                }
            }
        }
        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied_to..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_sqlite_to_postgres() {
        let sql = "select * from t where a = ?1 and b = ?2";
        assert_eq!(
            translate_placeholders(sql),
            "select * from t where a = $1 and b = $2"
        );
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?1', ?1 -- ?2\n/* ?3 */ from t where a = ?1";
        assert_eq!(
            translate_placeholders(sql),
            "select '?1', $1 -- ?2\n/* ?3 */ from t where a = $1"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$foo$ select ?1 from t $foo$ where a = ?1";
        assert_eq!(
            translate_placeholders(sql),
            "$foo$ select ?1 from t $foo$ where a = $1"
        );
    }

    #[test]
    fn untouched_sql_is_borrowed() {
        let sql = "select * from t where a = $1";
        let res = translate_placeholders(sql);
        assert!(matches!(res, Cow::Borrowed(_)));
        assert_eq!(res, sql);
    }

    #[test]
    fn inlines_literals_for_placeholders() {
        let params = vec![RowValues::Int(1), RowValues::Text("x".into())];
        let res = inline_placeholders("INSERT INTO t (a,b) VALUES (?1,?2);", &params);
        assert_eq!(res, "INSERT INTO t (a,b) VALUES (1,'x');");
    }

    #[test]
    fn inlining_keeps_quoted_and_unmatched_placeholders() {
        let params = vec![RowValues::Null];
        let res = inline_placeholders("UPDATE t SET a=?1 WHERE b='?1' AND c=?2", &params);
        assert_eq!(res, "UPDATE t SET a=null WHERE b='?1' AND c=?2");
    }

    #[test]
    fn multibyte_text_survives_rewrites() {
        let params = vec![RowValues::Text("ü".into())];
        let res = inline_placeholders("SELECT 'é', ?1 -- ñ", &params);
        assert_eq!(res, "SELECT 'é', 'ü' -- ñ");
    }
}
