//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::convert::{to_records, to_typed};
pub use crate::decode::decode_value;
pub use crate::decode_result;
pub use crate::error::RowShapeError;
pub use crate::hstore::parse_hstore;
pub use crate::records::{Record, RecordType};
pub use crate::results::{FieldDescriptor, MappedRow, TextResultSet};
pub use crate::shape::{RowShape, ShapeSpec, ShapedRow};
pub use crate::traits::{
    ArrayLiteralParser, FromMapping, NoArrayParser, ResultSource, StaticTypeResolver,
    TypeResolver, Untargeted,
};
pub use crate::types::CellValue;
