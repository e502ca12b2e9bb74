//! strdict: a single-threaded, string-keyed dictionary built on a
//! fixed-capacity chained hash table.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small container for embedding in other components (e.g.
//!   protocol header tables), with each piece small enough to be
//!   reasoned about independently.
//! - Layers:
//!   - HashTable: the core. Owns a bucket array whose length is fixed at
//!     construction; resolves collisions by chaining; optionally folds
//!     ASCII case for both hashing and comparison.
//!   - Dictionary: the public-facing facade. One HashTable with 256
//!     buckets, case-sensitive, every operation forwarded verbatim.
//!
//! Constraints
//! - Single-threaded: exclusive access is enforced by `&mut self`; no
//!   locks, no atomics.
//! - Fixed capacity: no growth, no rehashing, ever. Load beyond the
//!   bucket count just lengthens chains.
//! - Duplicate keys are ALLOWED: inserting an existing key pushes a new
//!   entry onto the head of its chain rather than replacing the old one.
//!   Lookup sees the newest entry; removal peels entries off newest
//!   first. This is the defining semantic of the table, not an accident.
//! - Values are opaque bytes, deep-copied at insertion and borrowed out
//!   at lookup; an empty value is stored as "no value".
//!
//! Storage
//! - Entries live in a `slotmap` arena; buckets and the intra-chain
//!   `next` links hold arena keys instead of owning pointers. Unlinking
//!   an entry can therefore never double-free, and no `unsafe` is
//!   needed anywhere in the crate.
//!
//! Hash function
//! - The bucket index is bit-compatible with the legacy C table this
//!   crate replaces: the NUL-terminated key is read as 16-bit
//!   little-endian words, each XORed in after a shift by the low four
//!   bits of its word index, reduced modulo `capacity - 1`. That
//!   modulus makes the last bucket structurally unreachable; it is kept
//!   as-is so bucket placement matches the legacy table byte for byte.
//!   Consequently a capacity below 2 is rejected at construction.
//!
//! Notes and non-goals
//! - No persistence: `Dictionary::from_file` / `write_to_file` are
//!   declared hooks that fail with `Unsupported`; no on-disk format is
//!   defined.
//! - NotFound is `Option::None`, not an error.
//! - Keys are dynamically sized `String`s; the legacy fixed 256-byte
//!   key buffer (and its silent truncation) is gone.
//! - Case-insensitive mode folds ASCII only, `strcasecmp`-style;
//!   non-ASCII bytes compare verbatim.

mod dict;
mod error;
mod table;
mod table_proptest;

// Public surface
pub use dict::Dictionary;
pub use error::TableError;
pub use table::{bucket_index, HashTable, Iter};
