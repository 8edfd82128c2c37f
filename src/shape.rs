//! Per-result shape selection and row decoding.
//!
//! A [`RowShape`] is built once per result: canonical field types are
//! resolved through the [`TypeResolver`] at construction, and for the
//! record shape the generated type is resolved through the process-wide
//! cache. Per-row work is then strictly cell decoding; no type resolution
//! and no target inspection happen inside [`RowShape::decode`].

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::decode::decode_value;
use crate::error::RowShapeError;
use crate::records::{Record, RecordType};
use crate::results::MappedRow;
use crate::traits::{ArrayLiteralParser, FromMapping, ResultSource, TypeResolver, Untargeted};
use crate::types::CellValue;

/// The target representation requested for decoded rows.
///
/// Selected once per result and never revisited per row. `Auto` falls back
/// to a bare scalar for single-field results and a positional tuple
/// otherwise.
pub enum ShapeSpec<T: FromMapping = Untargeted> {
    /// No explicit target: scalar or tuple by field count
    Auto,
    /// Ordered field-name/value mapping per row
    Mapping,
    /// Generated record type per row
    Record,
    /// Caller-supplied mapping-constructible type per row
    Typed(PhantomData<T>),
}

impl ShapeSpec {
    /// Spec naming a caller-supplied mapping-constructible target.
    ///
    /// The capability requirement is the `T: FromMapping` bound itself, so
    /// a target without the capability is rejected before anything runs.
    #[must_use]
    pub fn typed<T: FromMapping>() -> ShapeSpec<T> {
        ShapeSpec::Typed(PhantomData)
    }
}

// Canonical field types resolved once per result, plus the array-literal
// collaborator handle. Shared by every shape variant and reused for every
// row.
struct CellDecoder {
    types: Vec<String>,
    arrays: Arc<dyn ArrayLiteralParser + Send + Sync>,
}

impl CellDecoder {
    fn build<R: ResultSource>(
        result: &R,
        resolver: &dyn TypeResolver,
        arrays: Arc<dyn ArrayLiteralParser + Send + Sync>,
    ) -> Self {
        let types = (0..result.field_count())
            .map(|idx| {
                let (type_oid, type_modifier) = result.field_type(idx);
                resolver.canonical_type_name(type_oid, type_modifier)
            })
            .collect();
        Self { types, arrays }
    }

    fn decode_cell(&self, idx: usize, cell: Option<&str>) -> Result<CellValue, RowShapeError> {
        match cell {
            None => Ok(CellValue::Null),
            Some(raw) => decode_value(&self.types[idx], raw, self.arrays.as_ref()),
        }
    }

    fn decode_row<R: ResultSource>(
        &self,
        result: &R,
        row: usize,
    ) -> Result<Vec<CellValue>, RowShapeError> {
        (0..self.types.len())
            .map(|idx| self.decode_cell(idx, result.cell(row, idx)))
            .collect()
    }
}

/// Single-field results decoded to the bare value, never wrapped.
pub struct ScalarShape {
    cells: CellDecoder,
}

/// Positional decoding, one value vector per row in field order.
pub struct TupleShape {
    cells: CellDecoder,
}

/// Field-name/value mapping per row; the key vector and lookup index are
/// built once and shared by every row.
pub struct MappingShape {
    cells: CellDecoder,
    keys: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
}

/// Generated-record decoding; the record type is resolved through the
/// process-wide cache at construction.
pub struct StructShape {
    cells: CellDecoder,
    ty: Arc<RecordType>,
}

/// Mapping decoding handed to the target type's mapping constructor.
pub struct TypedShape<T: FromMapping> {
    inner: MappingShape,
    target: PhantomData<T>,
}

impl MappingShape {
    fn new(cells: CellDecoder, names: Vec<String>) -> Self {
        let index = Arc::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        Self {
            cells,
            keys: Arc::new(names),
            index,
        }
    }

    fn decode<R: ResultSource>(&self, result: &R, row: usize) -> Result<MappedRow, RowShapeError> {
        let values = self.cells.decode_row(result, row)?;
        Ok(MappedRow::with_shared_index(
            Arc::clone(&self.keys),
            Arc::clone(&self.index),
            values,
        ))
    }
}

/// One decoded row in its selected representation.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedRow<T = Untargeted> {
    Scalar(CellValue),
    Tuple(Vec<CellValue>),
    Mapping(MappedRow),
    Record(Record),
    Typed(T),
}

impl<T> ShapedRow<T> {
    pub fn into_scalar(self) -> Option<CellValue> {
        if let ShapedRow::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    pub fn into_tuple(self) -> Option<Vec<CellValue>> {
        if let ShapedRow::Tuple(values) = self {
            Some(values)
        } else {
            None
        }
    }

    pub fn into_mapping(self) -> Option<MappedRow> {
        if let ShapedRow::Mapping(row) = self {
            Some(row)
        } else {
            None
        }
    }

    pub fn into_record(self) -> Option<Record> {
        if let ShapedRow::Record(record) = self {
            Some(record)
        } else {
            None
        }
    }

    pub fn into_typed(self) -> Option<T> {
        if let ShapedRow::Typed(target) = self {
            Some(target)
        } else {
            None
        }
    }
}

/// Row-decoding strategy, resolved once per result.
pub enum RowShape<T: FromMapping = Untargeted> {
    Scalar(ScalarShape),
    Tuple(TupleShape),
    Mapping(MappingShape),
    Struct(StructShape),
    Typed(TypedShape<T>),
}

impl<T: FromMapping> RowShape<T> {
    /// Select the shape for one result.
    ///
    /// Explicit targets win over the automatic split: a record request
    /// beats a mapping request beats a typed target; with no target the
    /// field count decides between scalar and tuple. Canonical type
    /// resolution happens here, once, and [`decode`](Self::decode) reuses
    /// it for every row.
    pub fn select<R: ResultSource>(
        result: &R,
        resolver: &dyn TypeResolver,
        arrays: Arc<dyn ArrayLiteralParser + Send + Sync>,
        spec: ShapeSpec<T>,
    ) -> RowShape<T> {
        let cells = CellDecoder::build(result, resolver, arrays);
        let field_names = |result: &R| -> Vec<String> {
            (0..result.field_count())
                .map(|idx| result.field_name(idx).to_string())
                .collect()
        };

        match spec {
            ShapeSpec::Record => {
                let names = field_names(result);
                debug!(fields = names.len(), "selected record row shape");
                RowShape::Struct(StructShape {
                    ty: RecordType::get_or_create(&names),
                    cells,
                })
            }
            ShapeSpec::Mapping => {
                debug!(fields = result.field_count(), "selected mapping row shape");
                RowShape::Mapping(MappingShape::new(cells, field_names(result)))
            }
            ShapeSpec::Typed(_) => {
                debug!(fields = result.field_count(), "selected typed row shape");
                RowShape::Typed(TypedShape {
                    inner: MappingShape::new(cells, field_names(result)),
                    target: PhantomData,
                })
            }
            ShapeSpec::Auto if result.field_count() == 1 => {
                debug!("selected scalar row shape");
                RowShape::Scalar(ScalarShape { cells })
            }
            // Zero-field results land here and decode to empty tuples.
            ShapeSpec::Auto => {
                debug!(fields = result.field_count(), "selected tuple row shape");
                RowShape::Tuple(TupleShape { cells })
            }
        }
    }

    /// Decode one row into the selected representation.
    ///
    /// # Errors
    /// Propagates decoding and construction errors; a row either fully
    /// decodes or fails as a whole.
    pub fn decode<R: ResultSource>(
        &self,
        result: &R,
        row: usize,
    ) -> Result<ShapedRow<T>, RowShapeError> {
        match self {
            RowShape::Scalar(shape) => Ok(ShapedRow::Scalar(
                shape.cells.decode_cell(0, result.cell(row, 0))?,
            )),
            RowShape::Tuple(shape) => {
                Ok(ShapedRow::Tuple(shape.cells.decode_row(result, row)?))
            }
            RowShape::Mapping(shape) => Ok(ShapedRow::Mapping(shape.decode(result, row)?)),
            RowShape::Struct(shape) => {
                let values = shape.cells.decode_row(result, row)?;
                Ok(ShapedRow::Record(Record::new(&shape.ty, values)?))
            }
            RowShape::Typed(shape) => {
                let mapping = shape.inner.decode(result, row)?;
                Ok(ShapedRow::Typed(T::from_mapping(mapping)?))
            }
        }
    }
}
