//! Dictionary: the default-capacity, case-sensitive facade over `HashTable`.

use crate::error::TableError;
use crate::table::{HashTable, Iter};
use std::path::Path;

/// Bucket count of every `Dictionary`. Fixed; the facade exposes no way
/// to choose another.
const DICT_CAPACITY: usize = 256;

/// A case-sensitive string dictionary with 256 buckets.
///
/// Thin facade over [`HashTable`]: every method delegates verbatim with
/// the table's exact semantics, including duplicate-key stacking and
/// one-at-a-time removal. Use `HashTable` directly when a different
/// capacity or case-insensitive keys are needed.
#[derive(Debug)]
pub struct Dictionary {
    table: HashTable,
}

impl Dictionary {
    pub fn new() -> Self {
        // DICT_CAPACITY >= 2, so construction cannot fail.
        let table = HashTable::with_capacity(DICT_CAPACITY, false).unwrap();
        Self { table }
    }

    /// See [`HashTable::count`].
    pub fn count(&self) -> usize {
        self.table.count()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// See [`HashTable::insert`].
    pub fn insert(&mut self, key: impl Into<String>, value: &[u8]) {
        self.table.insert(key, value)
    }

    /// See [`HashTable::value`].
    pub fn value(&self, key: &str) -> Option<&[u8]> {
        self.table.value(key)
    }

    /// See [`HashTable::contains_key`].
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// See [`HashTable::remove`].
    pub fn remove(&mut self, key: &str) {
        self.table.remove(key)
    }

    /// See [`HashTable::clear`].
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// See [`HashTable::iter`].
    pub fn iter(&self) -> Iter<'_> {
        self.table.iter()
    }

    /// Declared collaborator hook with no defined behavior: always fails
    /// with [`TableError::Unsupported`]. No on-disk layout exists.
    pub fn from_file(_path: &Path) -> Result<Self, TableError> {
        Err(TableError::Unsupported("loading a dictionary from a file"))
    }

    /// Declared collaborator hook with no defined behavior: always fails
    /// with [`TableError::Unsupported`].
    pub fn write_to_file(&self, _path: &Path) -> Result<(), TableError> {
        Err(TableError::Unsupported("writing a dictionary to a file"))
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}
