//! Typed decoding and row shaping for text-encoded SQL query results.
//!
//! A driver hands over a fetched result: ordered field descriptors plus
//! rows of nullable text cells. This crate resolves each field's canonical
//! type name once per result, decodes every cell into a [`CellValue`], and
//! materializes rows into the representation the caller asked for: a bare
//! scalar, a positional tuple, an ordered [`MappedRow`], an instance of a
//! cached generated [`Record`] type, or any caller type implementing
//! [`FromMapping`]. Mapping rows can then be re-materialized recursively,
//! expanding nested association fields (see [`convert`]).
//!
//! Query execution, connections, transactions and SQL building live
//! elsewhere; the driver result, catalog type resolution and the general
//! array-literal grammar come in through the traits in [`traits`].

use std::sync::Arc;

pub mod convert;
pub mod decode;
pub mod error;
pub mod hstore;
pub mod prelude;
pub mod records;
pub mod results;
pub mod shape;
pub mod traits;
pub mod types;

pub use error::RowShapeError;
pub use records::{Record, RecordType};
pub use results::{FieldDescriptor, MappedRow, TextResultSet};
pub use shape::{RowShape, ShapeSpec, ShapedRow};
pub use traits::{
    ArrayLiteralParser, FromMapping, NoArrayParser, ResultSource, StaticTypeResolver,
    TypeResolver, Untargeted,
};
pub use types::CellValue;

/// Select a shape for `result` and decode every row with it.
///
/// Shape selection and type resolution cost is paid once here, independent
/// of row count.
///
/// # Errors
/// Stops at the first row that fails to decode or construct.
pub fn decode_result<R, T>(
    result: &R,
    resolver: &dyn TypeResolver,
    arrays: Arc<dyn ArrayLiteralParser + Send + Sync>,
    spec: ShapeSpec<T>,
) -> Result<Vec<ShapedRow<T>>, RowShapeError>
where
    R: ResultSource,
    T: FromMapping,
{
    let shape = RowShape::select(result, resolver, arrays, spec);
    let mut rows = Vec::with_capacity(result.row_count());
    for idx in 0..result.row_count() {
        rows.push(shape.decode(result, idx)?);
    }
    Ok(rows)
}
