use thiserror::Error;

/// Errors produced while decoding result cells or materializing rows.
///
/// Unrecognized canonical type names are deliberately *not* represented
/// here: they fall back to raw-text passthrough instead of failing.
#[derive(Debug, Error)]
pub enum RowShapeError {
    /// A non-null cell's text did not match the grammar implied by its
    /// canonical type (bad integer/float/boolean literal, malformed JSON,
    /// unparseable timestamp).
    #[error("Value format error: {0}")]
    FormatError(String),

    /// A target type rejected the mapping it was asked to build from, or a
    /// record type was instantiated with the wrong number of values.
    #[error("Record construction error: {0}")]
    ConstructionError(String),

    /// Reserved for hstore literal syntax outside the permissive-scan
    /// grammar. Malformed pairs are skipped rather than reported, so the
    /// current scanner never produces this.
    #[error("Hstore literal error: {0}")]
    HstoreLiteralError(String),
}
