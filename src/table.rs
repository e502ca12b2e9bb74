//! HashTable: fixed-capacity chained hash table over string keys.

use crate::error::TableError;
use slotmap::{DefaultKey, SlotMap};

/// One stored binding. Chains are threaded through the arena with
/// `next` keys rather than owning pointers, so unlinking can never
/// double-free and a stale key can never be dereferenced.
#[derive(Debug)]
struct Entry {
    key: String,
    value: Option<Box<[u8]>>,
    next: Option<DefaultKey>,
}

/// Index of the bucket `key` belongs to in a table of `capacity` buckets.
///
/// Bit-compatible with the legacy C `strhash` this table replaces: the
/// NUL-terminated key
/// bytes are read as `(len + 1) / 2` little-endian 16-bit words (an
/// even-length key excludes the terminator, an odd-length key pairs its
/// final byte with it), each word is XORed into a 64-bit accumulator
/// shifted by the low four bits of its word index, and the result is
/// reduced modulo `capacity - 1`. The modulus makes bucket
/// `capacity - 1` unreachable; that quirk is kept deliberately, see the
/// crate docs.
///
/// `capacity` must be at least 2; `HashTable::with_capacity` enforces it.
pub fn bucket_index(key: &str, capacity: usize, ignore_case: bool) -> usize {
    debug_assert!(capacity >= 2);

    let folded;
    let bytes = if ignore_case {
        folded = key.to_ascii_uppercase();
        folded.as_bytes()
    } else {
        key.as_bytes()
    };

    let mut acc: u64 = 0;
    for i in 0..(bytes.len() + 1) / 2 {
        let lo = bytes[2 * i] as u16;
        let hi = bytes.get(2 * i + 1).copied().unwrap_or(0) as u16;
        let word = lo | (hi << 8);
        acc ^= (word as u64) << (i & 0xf);
    }
    (acc % (capacity as u64 - 1)) as usize
}

/// Location of a matched entry: its bucket, its predecessor in the
/// chain (None when it is the head), and its arena slot.
struct Found {
    bucket: usize,
    prev: Option<DefaultKey>,
    slot: DefaultKey,
}

/// A string-keyed hash table with a bucket count fixed at construction.
///
/// Collisions are resolved by chaining; the chains live in a slotmap
/// arena and buckets hold the chain-head keys. Inserting a key that is
/// already present does NOT replace the existing entry: the new entry is
/// pushed onto the head of the chain and shadows the old one until it is
/// removed. There is no rehashing and no growth.
#[derive(Debug)]
pub struct HashTable {
    buckets: Box<[Option<DefaultKey>]>,
    slots: SlotMap<DefaultKey, Entry>,
    ignore_case: bool,
}

impl HashTable {
    /// Create a table with `capacity` buckets, fixed for its lifetime.
    ///
    /// With `ignore_case` set, hashing and key comparison both fold
    /// ASCII case, so `"Content-Type"` and `"content-type"` are the same
    /// key. Capacities below 2 are rejected: the bucket formula reduces
    /// modulo `capacity - 1`.
    pub fn with_capacity(capacity: usize, ignore_case: bool) -> Result<Self, TableError> {
        if capacity < 2 {
            return Err(TableError::InvalidCapacity { capacity });
        }
        Ok(Self {
            buckets: vec![None; capacity].into_boxed_slice(),
            slots: SlotMap::with_key(),
            ignore_case,
        })
    }

    /// Number of buckets, as given at construction.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Whether this table folds ASCII case when hashing and comparing.
    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Number of live entries, in O(1). Duplicate keys count once per
    /// entry, not once per distinct key.
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn keys_match(&self, stored: &str, query: &str) -> bool {
        if self.ignore_case {
            stored.eq_ignore_ascii_case(query)
        } else {
            stored == query
        }
    }

    /// Walk the chain for `key` and return the first match, which by
    /// head insertion is the most recently inserted entry for that key.
    fn find(&self, key: &str) -> Option<Found> {
        let bucket = bucket_index(key, self.buckets.len(), self.ignore_case);
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(slot) = cur {
            let entry = &self.slots[slot];
            if self.keys_match(&entry.key, key) {
                return Some(Found { bucket, prev, slot });
            }
            prev = Some(slot);
            cur = entry.next;
        }
        None
    }

    /// Insert a new entry for `key`, copying `value` into table-owned
    /// storage. An empty `value` is recorded as "no value": the key is
    /// stored but `value()` reports it as absent.
    ///
    /// Never overwrites. Inserting an existing key accumulates a second
    /// entry at the head of the chain; lookups see the newest one.
    pub fn insert(&mut self, key: impl Into<String>, value: &[u8]) {
        let key = key.into();
        let bucket = bucket_index(&key, self.buckets.len(), self.ignore_case);
        let value = if value.is_empty() {
            None
        } else {
            Some(Box::from(value))
        };
        let head = self.buckets[bucket];
        let slot = self.slots.insert(Entry {
            key,
            value,
            next: head,
        });
        self.buckets[bucket] = Some(slot);
    }

    /// Borrow the value of the most recently inserted entry for `key`.
    ///
    /// Returns `None` both when no entry matches and when the matched
    /// entry was inserted with an empty value; `contains_key`
    /// distinguishes the two. The borrow is into table-owned storage and
    /// ends at the next mutating call.
    pub fn value(&self, key: &str) -> Option<&[u8]> {
        let found = self.find(key)?;
        self.slots[found.slot].value.as_deref()
    }

    /// Whether any entry with `key` exists, valued or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Remove the most recently inserted entry for `key`, if any.
    ///
    /// At most one entry is removed per call; a key inserted N times
    /// needs N calls to disappear entirely. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) {
        let Some(found) = self.find(key) else { return };
        let entry = self.slots.remove(found.slot).unwrap();
        match found.prev {
            Some(prev) => self.slots[prev].next = entry.next,
            None => self.buckets[found.bucket] = entry.next,
        }
    }

    /// Drop every entry and reset every bucket to empty.
    ///
    /// The table stays usable afterwards with its capacity and case mode
    /// unchanged; `count()` is 0.
    pub fn clear(&mut self) {
        self.slots.clear();
        for head in self.buckets.iter_mut() {
            *head = None;
        }
    }

    /// Iterate over `(key, value)` of every live entry, in unspecified
    /// order. Entries inserted with an empty value yield `None`.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter(),
        }
    }

    /// Structural self-check used by the property tests: every entry
    /// must be reachable from exactly one bucket, sit in the bucket its
    /// key hashes to, and the chains must be acyclic.
    #[cfg(test)]
    pub(crate) fn check_chain_invariants(&self) {
        let mut reachable = 0usize;
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            let mut steps = 0usize;
            while let Some(slot) = cur {
                let entry = &self.slots[slot];
                assert_eq!(
                    bucket_index(&entry.key, self.buckets.len(), self.ignore_case),
                    bucket,
                    "entry for {:?} reachable from the wrong bucket",
                    entry.key
                );
                reachable += 1;
                steps += 1;
                assert!(steps <= self.slots.len(), "cycle in bucket {}", bucket);
                cur = entry.next;
            }
        }
        assert_eq!(reachable, self.slots.len(), "count out of sync with chains");
    }
}

/// Iterator over immutable entries in `HashTable`.
pub struct Iter<'a> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, Option<&'a [u8]>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(_, e)| (e.key.as_str(), e.value.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the bucket formula is bit-compatible with the legacy
    /// word-XOR hash. Hand-computed vectors for capacity 8 (modulus 7):
    /// "a" = word 0x0061 -> 97 % 7 = 6; "A" = 0x0041 -> 65 % 7 = 2;
    /// "ab" = 0x6261 -> 25185 % 7 = 6; "abc" = 0x6261 ^ (0x0063 << 1)
    /// = 25185 ^ 198 = 25255 -> 25255 % 7 = 6.
    #[test]
    fn bucket_index_reference_vectors() {
        assert_eq!(bucket_index("a", 8, false), 6);
        assert_eq!(bucket_index("A", 8, false), 2);
        assert_eq!(bucket_index("ab", 8, false), 6);
        assert_eq!(bucket_index("abc", 8, false), 6);
        assert_eq!(bucket_index("", 8, false), 0);
    }

    /// Invariant: case folding happens before hashing, so both spellings
    /// land where the uppercase form does.
    #[test]
    fn bucket_index_case_folding() {
        assert_eq!(bucket_index("a", 8, true), bucket_index("A", 8, false));
        assert_eq!(
            bucket_index("Content-Type", 64, true),
            bucket_index("CONTENT-TYPE", 64, true)
        );
        // Case-sensitive mode keeps the spellings apart (for these keys).
        assert_ne!(bucket_index("a", 8, false), bucket_index("A", 8, false));
    }

    /// Invariant: the modulus is `capacity - 1`, so the last bucket
    /// never receives a key and every index stays below it.
    #[test]
    fn bucket_index_last_bucket_unreachable() {
        for cap in [2usize, 3, 8, 100, 256] {
            for key in ["", "a", "zz", "Content-Length", "a slightly longer key"] {
                assert!(bucket_index(key, cap, false) < cap - 1);
            }
        }
    }

    #[test]
    fn capacity_below_two_is_rejected() {
        assert_eq!(
            HashTable::with_capacity(0, false).unwrap_err(),
            TableError::InvalidCapacity { capacity: 0 }
        );
        assert_eq!(
            HashTable::with_capacity(1, true).unwrap_err(),
            TableError::InvalidCapacity { capacity: 1 }
        );
        assert!(HashTable::with_capacity(2, false).is_ok());
    }

    /// Invariant: construction parameters are fixed and observable.
    #[test]
    fn construction_parameters_stick() {
        let t = HashTable::with_capacity(16, true).unwrap();
        assert_eq!(t.capacity(), 16);
        assert!(t.ignore_case());
        assert_eq!(t.count(), 0);
        assert!(t.is_empty());
    }

    #[test]
    fn insert_then_value_round_trip() {
        let mut t = HashTable::with_capacity(8, false).unwrap();
        t.insert("hello", b"world");
        assert_eq!(t.count(), 1);
        assert_eq!(t.value("hello"), Some(&b"world"[..]));
        assert_eq!(t.value("absent"), None);
        t.check_chain_invariants();
    }

    /// Invariant: duplicate keys stack instead of overwriting; the
    /// newest entry shadows the older ones and removal peels them off
    /// one at a time, newest first.
    #[test]
    fn duplicate_keys_stack_and_unstack() {
        let mut t = HashTable::with_capacity(8, false).unwrap();
        t.insert("k", b"first");
        t.insert("k", b"second");
        t.insert("k", b"third");
        assert_eq!(t.count(), 3);
        assert_eq!(t.value("k"), Some(&b"third"[..]));

        t.remove("k");
        assert_eq!(t.count(), 2);
        assert_eq!(t.value("k"), Some(&b"second"[..]));

        t.remove("k");
        assert_eq!(t.value("k"), Some(&b"first"[..]));

        t.remove("k");
        assert_eq!(t.count(), 0);
        assert_eq!(t.value("k"), None);
        t.check_chain_invariants();
    }

    /// Invariant: removal relinks the chain correctly whether the match
    /// is at the head, in the middle, or at the tail. Capacity 2 forces
    /// every key into bucket 0.
    #[test]
    fn remove_relinks_within_a_shared_chain() {
        let mut t = HashTable::with_capacity(2, false).unwrap();
        t.insert("a", b"1");
        t.insert("b", b"2");
        t.insert("c", b"3");
        assert_eq!(t.count(), 3);
        t.check_chain_invariants();

        // Middle of the chain (insertion order a, b, c -> chain c, b, a).
        t.remove("b");
        assert_eq!(t.count(), 2);
        assert_eq!(t.value("a"), Some(&b"1"[..]));
        assert_eq!(t.value("c"), Some(&b"3"[..]));
        assert_eq!(t.value("b"), None);
        t.check_chain_invariants();

        // Head, then tail.
        t.remove("c");
        t.remove("a");
        assert!(t.is_empty());
        t.check_chain_invariants();
    }

    #[test]
    fn remove_absent_key_is_a_noop() {
        let mut t = HashTable::with_capacity(8, false).unwrap();
        t.insert("present", b"x");
        t.remove("missing");
        assert_eq!(t.count(), 1);
        assert_eq!(t.value("present"), Some(&b"x"[..]));
    }

    /// Invariant: an empty value records the key without a value;
    /// `value` conflates it with absence, `contains_key` does not.
    #[test]
    fn empty_value_is_stored_as_no_value() {
        let mut t = HashTable::with_capacity(8, false).unwrap();
        t.insert("bare", b"");
        assert_eq!(t.count(), 1);
        assert_eq!(t.value("bare"), None);
        assert!(t.contains_key("bare"));
        assert!(!t.contains_key("never"));
    }

    /// Invariant: clear empties the table but leaves it usable with the
    /// same capacity and mode.
    #[test]
    fn clear_empties_and_table_stays_usable() {
        let mut t = HashTable::with_capacity(8, false).unwrap();
        for (i, key) in ["a", "b", "c", "d"].iter().enumerate() {
            t.insert(*key, &[i as u8]);
        }
        assert_eq!(t.count(), 4);

        t.clear();
        assert_eq!(t.count(), 0);
        assert!(t.is_empty());
        assert_eq!(t.value("a"), None);
        assert_eq!(t.capacity(), 8);

        // Clearing an already-empty table is fine.
        t.clear();

        t.insert("a", b"again");
        assert_eq!(t.value("a"), Some(&b"again"[..]));
        t.check_chain_invariants();
    }

    /// Invariant: in case-insensitive mode any spelling of the key finds
    /// the entry; in case-sensitive mode only the exact spelling does.
    #[test]
    fn case_modes_govern_lookup() {
        let mut ci = HashTable::with_capacity(64, true).unwrap();
        ci.insert("Content-Type", b"text/html");
        assert_eq!(ci.value("content-type"), Some(&b"text/html"[..]));
        assert_eq!(ci.value("CONTENT-TYPE"), Some(&b"text/html"[..]));

        let mut cs = HashTable::with_capacity(64, false).unwrap();
        cs.insert("Content-Type", b"text/html");
        assert_eq!(cs.value("Content-Type"), Some(&b"text/html"[..]));
        assert_eq!(cs.value("content-type"), None);
        assert_eq!(cs.value("CONTENT-TYPE"), None);
    }

    /// Invariant: case-insensitive removal matches any spelling and
    /// still removes exactly one entry.
    #[test]
    fn case_insensitive_remove_matches_any_spelling() {
        let mut t = HashTable::with_capacity(16, true).unwrap();
        t.insert("Host", b"a");
        t.insert("HOST", b"b");
        assert_eq!(t.count(), 2);
        assert_eq!(t.value("host"), Some(&b"b"[..]));

        t.remove("hOsT");
        assert_eq!(t.count(), 1);
        assert_eq!(t.value("host"), Some(&b"a"[..]));
        t.check_chain_invariants();
    }

    /// Invariant: iteration yields each live entry exactly once.
    #[test]
    fn iter_visits_every_entry_once() {
        let mut t = HashTable::with_capacity(4, false).unwrap();
        t.insert("a", b"1");
        t.insert("b", b"2");
        t.insert("a", b"3");
        t.insert("bare", b"");

        assert_eq!(t.iter().count(), t.count());
        let a_entries = t.iter().filter(|(k, _)| *k == "a").count();
        assert_eq!(a_entries, 2);
        let bare = t.iter().find(|(k, _)| *k == "bare").unwrap();
        assert_eq!(bare.1, None);
    }
}
