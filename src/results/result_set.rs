use serde::{Deserialize, Serialize};

use crate::traits::ResultSource;

/// Metadata for one result field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as reported by the driver
    pub name: String,
    /// Catalog type OID
    pub type_oid: u32,
    /// Type modifier, -1 when the type carries none
    pub type_modifier: i32,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_oid: u32) -> Self {
        Self {
            name: name.into(),
            type_oid,
            type_modifier: -1,
        }
    }

    #[must_use]
    pub fn with_modifier(mut self, type_modifier: i32) -> Self {
        self.type_modifier = type_modifier;
        self
    }
}

/// An owned, fully fetched result: field descriptors plus rows of nullable
/// text cells.
///
/// This is the in-memory [`ResultSource`] implementation for callers and
/// tests that hold data already read off the wire. Drivers with their own
/// result objects implement [`ResultSource`] directly instead of copying
/// into this.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextResultSet {
    /// The field descriptors, in result order
    pub fields: Vec<FieldDescriptor>,
    /// The rows, each a vector of nullable text cells in field order
    pub rows: Vec<Vec<Option<String>>>,
}

impl TextResultSet {
    #[must_use]
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    /// Create a result set with a known row capacity
    #[must_use]
    pub fn with_capacity(fields: Vec<FieldDescriptor>, capacity: usize) -> Self {
        Self {
            fields,
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Add a row of nullable text cells. The caller keeps cell count equal
    /// to the field count.
    pub fn add_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }
}

impl ResultSource for TextResultSet {
    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn field_name(&self, idx: usize) -> &str {
        &self.fields[idx].name
    }

    fn field_type(&self, idx: usize) -> (u32, i32) {
        let field = &self.fields[idx];
        (field.type_oid, field.type_modifier)
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows[row][col].as_deref()
    }
}
