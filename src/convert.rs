//! Recursive re-materialization of decoded mapping rows.
//!
//! Operates after decoding, on fully typed mapping rows. Association fields
//! holding nested mappings (or sequences of them) are converted first, then
//! the row itself is materialized into the requested target. Nested rows
//! always become generated [`Record`]s, even under a typed outer target,
//! because they travel inside the mapping handed to the constructor.

use crate::error::RowShapeError;
use crate::records::{Record, RecordType};
use crate::results::MappedRow;
use crate::traits::FromMapping;
use crate::types::CellValue;

/// Materialize mapping rows as generated records, expanding the named
/// association fields first.
///
/// An empty `associations` slice means no expansion. Association fields
/// absent from a row are skipped; values that are neither a mapping nor a
/// sequence (nulls included) are left untouched.
///
/// # Errors
/// A row either fully converts or its error propagates; no partial rows
/// come back.
pub fn to_records(
    rows: Vec<MappedRow>,
    associations: &[&str],
) -> Result<Vec<Record>, RowShapeError> {
    rows.into_iter()
        .map(|row| record_from_row(row, associations))
        .collect()
}

/// Materialize mapping rows as a caller type, expanding the named
/// association fields first.
///
/// The target validates its own mapping; rejections propagate unchanged as
/// [`RowShapeError::ConstructionError`].
pub fn to_typed<T: FromMapping>(
    rows: Vec<MappedRow>,
    associations: &[&str],
) -> Result<Vec<T>, RowShapeError> {
    rows.into_iter()
        .map(|mut row| {
            expand_associations(&mut row, associations)?;
            T::from_mapping(row)
        })
        .collect()
}

fn record_from_row(mut row: MappedRow, associations: &[&str]) -> Result<Record, RowShapeError> {
    expand_associations(&mut row, associations)?;
    let ty = RecordType::get_or_create(row.keys());
    Record::new(&ty, row.into_values())
}

// Replace association values in place: a nested mapping becomes a single
// record keyed on its own field set, a sequence has each mapping element
// converted in order, everything else stays as-is. The same association set
// applies to nested rows.
fn expand_associations(row: &mut MappedRow, associations: &[&str]) -> Result<(), RowShapeError> {
    if associations.is_empty() {
        return Ok(());
    }

    for name in associations {
        let Some(value) = row.get_mut(name) else {
            continue;
        };
        match std::mem::replace(value, CellValue::Null) {
            CellValue::Map(nested) => {
                *value = CellValue::Record(record_from_row(nested, associations)?);
            }
            CellValue::Array(items) => {
                let mut converted = Vec::with_capacity(items.len());
                for item in items {
                    converted.push(match item {
                        CellValue::Map(nested) => {
                            CellValue::Record(record_from_row(nested, associations)?)
                        }
                        other => other,
                    });
                }
                *value = CellValue::Array(converted);
            }
            other => *value = other,
        }
    }
    Ok(())
}
