//! Parser for the textual hstore key/value literal encoding.
//!
//! The grammar is a comma-separated sequence of `key => value` pairs where
//! each side is either a double-quoted literal (backslash escapes for `"`
//! and `\`) or an unquoted literal with no unescaped whitespace, `=` or
//! `,`. The scan is permissive: input that matches no pair is skipped and
//! simply yields fewer pairs, it is not an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RowShapeError;
use crate::results::MappedRow;
use crate::types::CellValue;

// One pair per match: quoted or unquoted key, `=>`, quoted or unquoted
// value. Escaped characters never terminate an unquoted token, so an
// escaped `=` cannot be mistaken for the arrow.
static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:[^"\\]|\\.)*"|(?:[^\s=,\\]|\\.)+)\s*=>\s*("(?:[^"\\]|\\.)*"|(?:[^\s=,\\]|\\.)+)"#)
        .expect("hstore pair pattern is valid")
});

/// Parse an hstore literal into an ordered mapping.
///
/// Values are text, except the unquoted case-insensitive literal `NULL`,
/// which decodes to an explicit null rather than the four-character string.
///
/// # Errors
/// `RowShapeError::HstoreLiteralError` is reserved for literal syntax the
/// permissive scan cannot handle; the current grammar never produces it.
pub fn parse_hstore(raw: &str) -> Result<MappedRow, RowShapeError> {
    let mut pairs = Vec::new();
    for caps in PAIR_RE.captures_iter(raw) {
        let key = literal_text(&caps[1]);
        let value_token = &caps[2];
        let value = if !value_token.starts_with('"') && value_token.eq_ignore_ascii_case("null") {
            CellValue::Null
        } else {
            CellValue::Text(literal_text(value_token))
        };
        pairs.push((key, value));
    }
    Ok(MappedRow::from_pairs(pairs))
}

// Strip surrounding quotes when present and resolve `\X` escapes to `X`.
fn literal_text(token: &str) -> String {
    let quoted = token.len() >= 2 && token.starts_with('"') && token.ends_with('"');
    let inner = if quoted {
        &token[1..token.len() - 1]
    } else {
        token
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(row: &MappedRow, key: &str) -> String {
        row.get(key)
            .and_then(CellValue::as_text)
            .map(str::to_string)
            .unwrap()
    }

    #[test]
    fn parses_quoted_pairs() {
        let row = parse_hstore(r#""a"=>"1", "b"=>"two""#).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(text(&row, "a"), "1");
        assert_eq!(text(&row, "b"), "two");
    }

    #[test]
    fn parses_unquoted_pairs() {
        let row = parse_hstore("a=>1, b=>two").unwrap();
        assert_eq!(text(&row, "a"), "1");
        assert_eq!(text(&row, "b"), "two");
    }

    #[test]
    fn unquoted_null_is_explicit_null() {
        let row = parse_hstore(r#""a"=>"1", "b"=>NULL"#).unwrap();
        assert_eq!(row.get("a"), Some(&CellValue::Text("1".to_string())));
        assert_eq!(row.get("b"), Some(&CellValue::Null));
    }

    #[test]
    fn quoted_null_stays_text() {
        let row = parse_hstore(r#"b=>"NULL""#).unwrap();
        assert_eq!(row.get("b"), Some(&CellValue::Text("NULL".to_string())));
    }

    #[test]
    fn null_detection_ignores_case() {
        let row = parse_hstore("a=>null, b=>NuLl").unwrap();
        assert_eq!(row.get("a"), Some(&CellValue::Null));
        assert_eq!(row.get("b"), Some(&CellValue::Null));
    }

    #[test]
    fn resolves_escapes_in_quoted_literals() {
        let row = parse_hstore(r#""a\"b"=>"c\\d""#).unwrap();
        assert_eq!(text(&row, "a\"b"), "c\\d");
    }

    #[test]
    fn preserves_pair_order() {
        let row = parse_hstore("z=>1, a=>2, m=>3").unwrap();
        let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn malformed_input_yields_fewer_pairs() {
        let row = parse_hstore("garbage without arrows, a=>1, => , b=>2").unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(text(&row, "a"), "1");
        assert_eq!(text(&row, "b"), "2");
    }

    #[test]
    fn empty_input_is_empty_mapping() {
        let row = parse_hstore("").unwrap();
        assert!(row.is_empty());
    }
}
