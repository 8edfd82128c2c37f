use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, Serializer};

use crate::types::CellValue;

/// An ordered field-name/value mapping.
///
/// This is the mapping representation used for mapping-shaped rows, decoded
/// JSON objects and hstore literals. Key order is preserved; values are
/// positional in key order.
#[derive(Debug, Clone)]
pub struct MappedRow {
    /// The keys for this row (shared across all rows in a result set)
    keys: Arc<Vec<String>>,
    /// The values for this row
    values: Vec<CellValue>,
    // Key-to-index cache so lookups skip the linear scan
    index: Arc<HashMap<String, usize>>,
}

impl MappedRow {
    /// Create a row against a key vector shared across a whole result
    ///
    /// # Arguments
    ///
    /// * `keys` - The keys, in field order
    /// * `values` - The values for this row, positional in key order
    ///
    /// # Returns
    ///
    /// A new `MappedRow` instance
    #[must_use]
    pub fn with_shared_keys(keys: Arc<Vec<String>>, values: Vec<CellValue>) -> Self {
        // Build a cache of key to index for faster lookups
        let index = Arc::new(
            keys.iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );

        Self {
            keys,
            values,
            index,
        }
    }

    /// Create a row reusing an index cache built once for the key vector.
    /// Used by the mapping shape so the cache is not rebuilt per row.
    pub(crate) fn with_shared_index(
        keys: Arc<Vec<String>>,
        index: Arc<HashMap<String, usize>>,
        values: Vec<CellValue>,
    ) -> Self {
        Self {
            keys,
            values,
            index,
        }
    }

    /// Create a row from key/value pairs, preserving order
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, CellValue)>,
    {
        let (keys, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self::with_shared_keys(Arc::new(keys), values)
    }

    /// Get the index of a key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// The index of the key, or None if not found
    #[must_use]
    pub fn get_index(&self, key: &str) -> Option<usize> {
        // First check the cache
        if let Some(&idx) = self.index.get(key) {
            return Some(idx);
        }

        // Fall back to linear search
        self.keys.iter().position(|k| k == key)
    }

    /// Get a value by key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// The value at the key, or None if the key wasn't found
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.get_index(key).and_then(|idx| self.values.get(idx))
    }

    /// Get a mutable value by key
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CellValue> {
        let idx = self.get_index(key)?;
        self.values.get_mut(idx)
    }

    /// Get a value by position
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the value
    ///
    /// # Returns
    ///
    /// The value at the index, or None if the index is out of bounds
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// The keys, in order
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The values, positional in key order
    #[must_use]
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consume the row, keeping the values in key order
    #[must_use]
    pub fn into_values(self) -> Vec<CellValue> {
        self.values
    }
}

impl PartialEq for MappedRow {
    fn eq(&self, other: &Self) -> bool {
        *self.keys == *other.keys && self.values == other.values
    }
}

impl Serialize for MappedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
