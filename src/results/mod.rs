//! Result containers: the owned text result set and the ordered row mapping.

pub mod result_set;
pub mod row;

pub use result_set::{FieldDescriptor, TextResultSet};
pub use row::MappedRow;
