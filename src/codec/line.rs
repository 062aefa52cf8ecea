//! GEDCOM line tokenizer.
//!
//! Each physical line has the shape `LEVEL [XREF] TAG [VALUE]`. Tokenizing is lenient: a line
//! that does not fit is dropped rather than failing the whole file, since real exports carry
//! stray blank or corrupted lines.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// `@` + identifier + `@`
pub static XREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@[^@\s]+@$").expect("Hardcoded XREF_RE regex pattern should be valid")
});

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    pub level: usize,
    pub xref_id: Option<String>,
    pub tag: String,
    /// Remaining tokens joined by single spaces; empty when the tag carries no value.
    pub payload: String,
    /// 1-based position in the source text
    pub line_number: usize,
}

pub fn is_xref(token: &str) -> bool {
    XREF_RE.is_match(token)
}

/// Tokenize one line of text. Returns `None` for blank or malformed lines.
pub fn tokenize_line(text: &str, line_number: usize) -> Option<Line> {
    let mut tokens = text.trim_start_matches(BYTE_ORDER_MARK).split_whitespace();

    let level_token = tokens.next()?;
    if !level_token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let level = level_token.parse::<usize>().ok()?;

    let second = tokens.next()?;
    let (xref_id, tag) = if is_xref(second) {
        (Some(second.to_string()), tokens.next()?)
    } else {
        (None, second)
    };

    let payload = tokens.collect::<Vec<_>>().join(" ");

    Some(Line {
        level,
        xref_id,
        tag: tag.to_string(),
        payload,
        line_number,
    })
}

/// Tokenize a whole text. Line numbers count every physical line, including dropped ones.
pub fn tokenize(text: &str) -> impl Iterator<Item = Line> + '_ {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| tokenize_line(raw, idx + 1))
}
