//! Generated record types and the process-wide type cache.
//!
//! A [`RecordType`] is a nominal type synthesized from an ordered field-name
//! set. The cache hands out `Arc` handles, so two requests for the same
//! ordered set always receive the identical type, no matter which query or
//! thread they came from. The cache is empty at startup and lives for the
//! process lifetime; nothing is ever evicted.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use serde::ser::{Serialize, Serializer};
use tracing::debug;

use crate::error::RowShapeError;
use crate::types::CellValue;

type RecordTypeCache = LazyLock<Mutex<HashMap<Vec<String>, Arc<RecordType>>>>;

static RECORD_TYPES: RecordTypeCache = LazyLock::new(|| Mutex::new(HashMap::new()));

/// A nominal record type generated from an ordered field-name set.
///
/// Obtained only through [`RecordType::get_or_create`]; the returned `Arc`
/// is the type's identity. Records of the same shape therefore share one
/// type and compare by value, and the number of live types stays bounded by
/// the number of distinct shapes seen by the process.
#[derive(Debug)]
pub struct RecordType {
    fields: Vec<String>,
    index: HashMap<String, usize>,
}

impl RecordType {
    /// Look up or generate the type for an ordered field-name set.
    ///
    /// Get-or-insert runs under one lock, so a race between two first uses
    /// of the same set still yields a single type.
    pub fn get_or_create(fields: &[String]) -> Arc<RecordType> {
        let mut cache = match RECORD_TYPES.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Clear the poison and continue with the recovered data
                poisoned.into_inner()
            }
        };

        cache
            .entry(fields.to_vec())
            .or_insert_with(|| {
                debug!(arity = fields.len(), "generating record type");
                Arc::new(RecordType {
                    fields: fields.to_vec(),
                    index: fields
                        .iter()
                        .enumerate()
                        .map(|(i, name)| (name.clone(), i))
                        .collect(),
                })
            })
            .clone()
    }

    /// The field names, in order
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Position of a field by name
    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.index.get(field).copied()
    }
}

/// An instance of a generated record type.
#[derive(Debug, Clone)]
pub struct Record {
    ty: Arc<RecordType>,
    values: Vec<CellValue>,
}

impl Record {
    /// Build an instance of a generated type; values are positional in
    /// field order.
    ///
    /// # Errors
    /// Returns `RowShapeError::ConstructionError` when the value count does
    /// not match the field count.
    pub fn new(ty: &Arc<RecordType>, values: Vec<CellValue>) -> Result<Record, RowShapeError> {
        if values.len() != ty.fields.len() {
            return Err(RowShapeError::ConstructionError(format!(
                "record type with {} fields instantiated with {} values",
                ty.fields.len(),
                values.len()
            )));
        }
        Ok(Record {
            ty: Arc::clone(ty),
            values,
        })
    }

    /// The generated type this record belongs to
    #[must_use]
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    /// Get a field value by name
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.ty.index_of(field).and_then(|idx| self.values.get(idx))
    }

    /// Get a field value by position
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// The field values, positional in field order
    #[must_use]
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Consume the record, keeping the values in field order
    #[must_use]
    pub fn into_values(self) -> Vec<CellValue> {
        self.values
    }

    /// Iterate field name/value pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.ty
            .fields
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl PartialEq for Record {
    // Same generated type (by identity) and equal field values.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && self.values == other.values
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
