#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can call
// the structural self-check on private chain state.
//
// Model: per-key LIFO stacks of optional values (head insertion means
// the newest entry for a key shadows older ones; removal pops newest
// first). Keys are normalized to uppercase when the table folds case.
//
// Invariants asserted after every step:
// - count() equals the total number of stacked entries in the model.
// - value(key) equals the top of the key's stack (empty inserts are
//   modeled as None, matching the table's "no value" storage).
// - contains_key(key) equals stack non-emptiness.
// - Every entry is reachable from exactly the bucket its key hashes
//   to, and chains are acyclic (check_chain_invariants).

use crate::table::HashTable;
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, Vec<u8>),
    Remove(usize),
    Value(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-zA-Z-]{0,6}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), proptest::collection::vec(any::<u8>(), 0..8))
                .prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            3 => idx.clone().prop_map(Op::Value),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        (
            Just(pool),
            proptest::collection::vec(op, 1..100),
        )
    })
}

fn run_scenario(pool: Vec<String>, ops: Vec<Op>, capacity: usize, ignore_case: bool) {
    let mut table = HashTable::with_capacity(capacity, ignore_case).unwrap();
    // Model key -> stack of optional values, newest last.
    let mut model: HashMap<String, Vec<Option<Vec<u8>>>> = HashMap::new();
    let mut total = 0usize;

    let norm = |k: &str| {
        if ignore_case {
            k.to_ascii_uppercase()
        } else {
            k.to_owned()
        }
    };

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let key = &pool[i];
                table.insert(key.clone(), &v);
                let modeled = if v.is_empty() { None } else { Some(v) };
                model.entry(norm(key)).or_default().push(modeled);
                total += 1;
            }
            Op::Remove(i) => {
                let key = &pool[i];
                table.remove(key);
                let stack = model.entry(norm(key)).or_default();
                if stack.pop().is_some() {
                    total -= 1;
                }
            }
            Op::Value(i) => {
                let key = &pool[i];
                let expected = model
                    .get(&norm(key))
                    .and_then(|stack| stack.last())
                    .and_then(|v| v.as_deref());
                assert_eq!(table.value(key), expected, "value mismatch for {:?}", key);
                let present = model
                    .get(&norm(key))
                    .map(|stack| !stack.is_empty())
                    .unwrap_or(false);
                assert_eq!(table.contains_key(key), present);
            }
            Op::Clear => {
                table.clear();
                model.clear();
                total = 0;
            }
            Op::Iterate => {
                assert_eq!(table.iter().count(), total);
            }
        }

        assert_eq!(table.count(), total);
        table.check_chain_invariants();
    }
}

proptest! {
    // Tiny capacity forces long shared chains; this is where relinking
    // bugs would show.
    #[test]
    fn prop_matches_model_capacity_2(scenario in arb_scenario()) {
        let (pool, ops) = scenario;
        run_scenario(pool, ops, 2, false);
    }

    #[test]
    fn prop_matches_model_capacity_8(scenario in arb_scenario()) {
        let (pool, ops) = scenario;
        run_scenario(pool, ops, 8, false);
    }

    #[test]
    fn prop_matches_model_ignore_case(scenario in arb_scenario()) {
        let (pool, ops) = scenario;
        run_scenario(pool, ops, 8, true);
    }
}
