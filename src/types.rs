use chrono::NaiveDateTime;
use serde::ser::{Serialize, Serializer};

use crate::records::Record;
use crate::results::MappedRow;

/// A decoded cell value.
///
/// This enum provides a unified representation of database values after
/// text decoding. Containers nest arbitrarily: JSON documents, hstore
/// literals and expanded association rows all land in the same shape.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text/string value
    Text(String),
    /// Timestamp value, wall clock, no time zone
    Timestamp(NaiveDateTime),
    /// Ordered sequence of values
    Array(Vec<CellValue>),
    /// Ordered field-name/value mapping
    Map(MappedRow),
    /// Instance of a generated record type
    Record(Record),
}

impl CellValue {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_int(&self) -> Option<&i64> {
        if let CellValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        if let CellValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<&bool> {
        if let CellValue::Bool(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let CellValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let CellValue::Timestamp(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&[CellValue]> {
        if let CellValue::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_map(&self) -> Option<&MappedRow> {
        if let CellValue::Map(row) = self {
            Some(row)
        } else {
            None
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        if let CellValue::Record(record) = self {
            Some(record)
        } else {
            None
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_unit(),
            CellValue::Int(value) => serializer.serialize_i64(*value),
            CellValue::Float(value) => serializer.serialize_f64(*value),
            CellValue::Bool(value) => serializer.serialize_bool(*value),
            CellValue::Text(value) => serializer.serialize_str(value),
            CellValue::Timestamp(value) => value.serialize(serializer),
            CellValue::Array(items) => serializer.collect_seq(items),
            CellValue::Map(row) => row.serialize(serializer),
            CellValue::Record(record) => record.serialize(serializer),
        }
    }
}
