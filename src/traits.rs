//! Collaborator interfaces consumed by the decoding core.
//!
//! The core never executes queries or touches a catalog: the driver result,
//! the OID-to-name resolution and the general array-literal grammar all come
//! in through these traits.

use std::collections::HashMap;

use crate::error::RowShapeError;
use crate::results::MappedRow;
use crate::types::CellValue;

/// Read-only view over a fully fetched driver result.
///
/// Field order is stable and shared by every row. Indexes passed to the
/// accessors must be in range; implementations are free to panic otherwise,
/// matching slice indexing.
pub trait ResultSource {
    /// Number of fields per row.
    fn field_count(&self) -> usize;

    /// Name of the field at `idx`.
    fn field_name(&self, idx: usize) -> &str;

    /// Catalog type OID and type modifier of the field at `idx`.
    fn field_type(&self, idx: usize) -> (u32, i32);

    /// Number of rows in the result.
    fn row_count(&self) -> usize;

    /// Text of one cell, or `None` for SQL NULL.
    fn cell(&self, row: usize, col: usize) -> Option<&str>;
}

/// Resolve a catalog type OID/modifier pair to a canonical type name.
///
/// Treated as a cache-friendly pure lookup: it is consulted once per field
/// when a shape is selected, never per row.
pub trait TypeResolver {
    fn canonical_type_name(&self, type_oid: u32, type_modifier: i32) -> String;
}

const BUILTIN_TYPES: [(u32, &str); 15] = [
    (16, "boolean"),
    (20, "bigint"),
    (23, "integer"),
    (25, "text"),
    (114, "json"),
    (700, "real"),
    (701, "double precision"),
    (705, "unknown"),
    (1007, "integer[]"),
    (1009, "text[]"),
    (1015, "character varying[]"),
    (1043, "character varying"),
    (1114, "timestamp without time zone"),
    (1700, "numeric"),
    (3802, "jsonb"),
];

/// [`TypeResolver`] backed by a static OID table.
///
/// `with_builtin_types` preloads the fixed catalog OIDs. Extension types
/// whose OIDs are assigned per database (hstore among them) are registered
/// by the caller via [`insert`](Self::insert) once their OID is known.
/// Unmapped OIDs resolve to `"unknown"`, which keeps the fail-open
/// raw-text passthrough in the decoder.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeResolver {
    by_oid: HashMap<u32, String>,
}

impl StaticTypeResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver preloaded with the common built-in catalog OIDs.
    #[must_use]
    pub fn with_builtin_types() -> Self {
        let mut resolver = Self::new();
        for (oid, name) in BUILTIN_TYPES {
            resolver.insert(oid, name);
        }
        resolver
    }

    /// Register or override the canonical name for one OID.
    pub fn insert(&mut self, type_oid: u32, name: impl Into<String>) {
        self.by_oid.insert(type_oid, name.into());
    }
}

impl TypeResolver for StaticTypeResolver {
    fn canonical_type_name(&self, type_oid: u32, _type_modifier: i32) -> String {
        self.by_oid
            .get(&type_oid)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// General array-literal parser collaborator.
///
/// Consulted for array types outside the integer fast path (`text[]`,
/// `character varying[]`). The nested-array grammar itself is not part of
/// this crate.
pub trait ArrayLiteralParser {
    /// Parse one array literal into an ordered sequence of decoded scalars.
    ///
    /// # Errors
    /// Returns `RowShapeError::FormatError` when the literal cannot be
    /// parsed.
    fn parse_array(&self, raw: &str) -> Result<Vec<CellValue>, RowShapeError>;
}

/// Placeholder collaborator for callers that never select array columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArrayParser;

impl ArrayLiteralParser for NoArrayParser {
    fn parse_array(&self, _raw: &str) -> Result<Vec<CellValue>, RowShapeError> {
        Err(RowShapeError::FormatError(
            "no array literal parser configured".to_string(),
        ))
    }
}

/// Capability for target types constructible from an ordered field mapping.
///
/// The implementation owns its field validation and decides how to treat a
/// mapping whose key set differs from what it expects; strict matching is
/// the recommended policy. Rejections surface as
/// [`RowShapeError::ConstructionError`].
pub trait FromMapping: Sized {
    fn from_mapping(row: MappedRow) -> Result<Self, RowShapeError>;
}

/// Default target for shapes that never construct a caller type.
///
/// Uninhabited: it exists only to satisfy the type parameter of
/// [`ShapeSpec`](crate::shape::ShapeSpec) and
/// [`RowShape`](crate::shape::RowShape) when no typed target is in play.
#[derive(Debug, Clone, PartialEq)]
pub enum Untargeted {}

impl FromMapping for Untargeted {
    fn from_mapping(_row: MappedRow) -> Result<Self, RowShapeError> {
        Err(RowShapeError::ConstructionError(
            "no mapping-constructible target configured".to_string(),
        ))
    }
}
