//! Text-to-value decoding for result cells.
//!
//! One pure function per cell: canonical type name plus raw text in, a
//! [`CellValue`] out. Null cells never reach this module; the shape layer
//! maps them straight to [`CellValue::Null`].

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use crate::error::RowShapeError;
use crate::hstore;
use crate::traits::ArrayLiteralParser;
use crate::types::CellValue;

// Integer literals inside an array literal: optional leading minus, digits.
// The fast path scans for these and ignores the enclosing array syntax.
static INT_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("integer literal pattern is valid"));

/// Decode one non-null cell according to its canonical type name.
///
/// Canonical names outside the dispatch table fail open: the raw text comes
/// back unchanged as [`CellValue::Text`]. Array types other than
/// `integer[]` are delegated to the `arrays` collaborator.
///
/// # Errors
/// Returns [`RowShapeError::FormatError`] when the text does not match the
/// grammar implied by the canonical type.
pub fn decode_value(
    type_name: &str,
    raw: &str,
    arrays: &dyn ArrayLiteralParser,
) -> Result<CellValue, RowShapeError> {
    match type_name {
        "unknown" | "character varying" => Ok(CellValue::Text(raw.to_string())),
        "integer" | "bigint" => decode_int(raw).map(CellValue::Int),
        "numeric" | "double precision" => decode_float(raw).map(CellValue::Float),
        "integer[]" => decode_int_array(raw),
        "character varying[]" | "text[]" => arrays.parse_array(raw).map(CellValue::Array),
        "timestamp without time zone" => decode_timestamp(raw).map(CellValue::Timestamp),
        "hstore" => hstore::parse_hstore(raw).map(CellValue::Map),
        "json" | "jsonb" => decode_json(raw),
        "boolean" => decode_bool(raw),
        _ => Ok(CellValue::Text(raw.to_string())),
    }
}

fn decode_int(raw: &str) -> Result<i64, RowShapeError> {
    raw.parse::<i64>()
        .map_err(|e| RowShapeError::FormatError(format!("bad integer literal {raw:?}: {e}")))
}

fn decode_float(raw: &str) -> Result<f64, RowShapeError> {
    raw.parse::<f64>()
        .map_err(|e| RowShapeError::FormatError(format!("bad float literal {raw:?}: {e}")))
}

fn decode_bool(raw: &str) -> Result<CellValue, RowShapeError> {
    match raw {
        "t" => Ok(CellValue::Bool(true)),
        "f" => Ok(CellValue::Bool(false)),
        _ => Err(RowShapeError::FormatError(format!(
            "bad boolean literal {raw:?}, expected \"t\" or \"f\""
        ))),
    }
}

fn decode_int_array(raw: &str) -> Result<CellValue, RowShapeError> {
    let mut items = Vec::new();
    for found in INT_LITERAL_RE.find_iter(raw) {
        let item = found.as_str().parse::<i64>().map_err(|e| {
            RowShapeError::FormatError(format!(
                "bad integer literal {:?} in array: {e}",
                found.as_str()
            ))
        })?;
        items.push(CellValue::Int(item));
    }
    Ok(CellValue::Array(items))
}

fn decode_json(raw: &str) -> Result<CellValue, RowShapeError> {
    let parsed: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| RowShapeError::FormatError(format!("malformed json: {e}")))?;
    Ok(json_to_cell(parsed))
}

fn json_to_cell(value: serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Number(n) => json_number(&n),
        serde_json::Value::String(s) => CellValue::Text(s),
        serde_json::Value::Array(items) => {
            CellValue::Array(items.into_iter().map(json_to_cell).collect())
        }
        serde_json::Value::Object(map) => CellValue::Map(crate::results::MappedRow::from_pairs(
            map.into_iter().map(|(key, v)| (key, json_to_cell(v))),
        )),
    }
}

fn json_number(n: &serde_json::Number) -> CellValue {
    if let Some(i) = n.as_i64() {
        CellValue::Int(i)
    } else if let Some(f) = n.as_f64() {
        CellValue::Float(f)
    } else {
        CellValue::Text(n.to_string())
    }
}

// The declared type carries no zone, so an offset in the literal never
// shifts the wall clock: the parsed date/time fields stand as written and
// the offset is dropped.
fn decode_timestamp(raw: &str) -> Result<NaiveDateTime, RowShapeError> {
    let trimmed = raw.trim();

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(if parsed.offset().local_minus_utc() == 0 {
                parsed.naive_utc()
            } else {
                parsed.naive_local()
            });
        }
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }

    Err(RowShapeError::FormatError(format!(
        "bad timestamp literal {raw:?}"
    )))
}
