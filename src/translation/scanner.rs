/// Lexical context of the placeholder walker.
#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Digit run starting at `start`: its end offset and text.
pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let len = bytes
        .get(start..)?
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len == 0 {
        return None;
    }
    let end = start + len;
    std::str::from_utf8(&bytes[start..end])
        .ok()
        .map(|digits| (end, digits))
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx..].starts_with(b"--")
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx..].starts_with(b"/*")
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes[idx..].starts_with(b"*/")
}

/// Recognize `$tag$` at `start`; returns the tag and the offset of its closing `$`.
pub(super) fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let tag_len = bytes[start + 1..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    let close = start + 1 + tag_len;
    if bytes.get(close) != Some(&b'$') {
        return None;
    }
    let tag = String::from_utf8(bytes[start + 1..close].to_vec()).ok()?;
    Some((tag, close))
}

/// True when the `$` at `idx` opens the closing `$tag$` of a dollar-quoted block.
pub(super) fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let rest = &bytes[idx + 1..];
    rest.starts_with(tag.as_bytes()) && rest.get(tag.len()) == Some(&b'$')
}
