//! Crate error type.

use thiserror::Error;

/// Errors surfaced by table construction and the dictionary's
/// persistence stubs. Lookups are not errors; they return `Option`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The bucket formula reduces modulo `capacity - 1`, so capacities
    /// 0 and 1 leave no usable bucket.
    #[error("capacity {capacity} is too small, a table needs at least 2 buckets")]
    InvalidCapacity { capacity: usize },

    /// Declared-but-unimplemented operation; no semantics are defined
    /// for it.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}
