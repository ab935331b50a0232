#![cfg(test)]

// Property tests for ProbeTable kept inside the crate so they can check
// release bookkeeping and slot-level invariants alongside the public API.

use crate::{Insertion, ProbeTable, TableConfig};
use hashbrown::HashMap;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// Pool-indexed operations: indices shrink toward earlier keys, and the pool
// itself shrinks, which keeps counterexamples small.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    InsertCopy(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(Vec<u8>),
    Mutate(usize, i32),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<Op>)> {
    // Short byte keys over a tiny alphabet so prefixes of different lengths
    // (and the empty key) show up often.
    proptest::collection::vec(proptest::collection::vec(0u8..3, 0..4), 1..=12).prop_flat_map(
        |pool| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let op = prop_oneof![
                4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertCopy(i, v)),
                3 => idx.clone().prop_map(Op::Remove),
                2 => idx.clone().prop_map(Op::Get),
                1 => proptest::collection::vec(0u8..3, 0..4).prop_map(Op::Contains),
                1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
                1 => Just(Op::Clear),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
        },
    )
}

fn arb_config() -> impl Strategy<Value = TableConfig> {
    (1usize..6, 0.1f64..=1.0, 1.0f64..3.0).prop_map(|(c, t, f)| TableConfig::new(c, t, f))
}

// Property: State-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences and configurations:
// - Insert reports Inserted/Replaced according to prior presence.
// - Each discarded value is released exactly once, in the order discarded.
// - `get`/`contains` agree with the model after every op (covers removal
//   in the middle of collision chains).
// - `len < capacity` and `len / capacity <= threshold` after every insert.
// - Capacity never shrinks.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), config in arb_config()) {
        let released = Rc::new(RefCell::new(Vec::new()));
        let sink = released.clone();
        let mut sut: ProbeTable<i32, _> =
            ProbeTable::with_config_and_release(config, move |v: i32| sink.borrow_mut().push(v)).unwrap();
        let mut model: HashMap<Vec<u8>, i32> = HashMap::new();
        let mut expected_released: Vec<i32> = Vec::new();
        let mut last_capacity = sut.capacity();

        for op in ops {
            let by_copy = matches!(op, Op::InsertCopy(..));
            match op {
                Op::Insert(i, v) | Op::InsertCopy(i, v) => {
                    let k = &pool[i];
                    let res = if by_copy {
                        sut.insert_copy(k, &v)
                    } else {
                        sut.insert(k, v)
                    };
                    match model.insert(k.clone(), v) {
                        Some(old) => {
                            prop_assert_eq!(res, Ok(Insertion::Replaced));
                            expected_released.push(old);
                        }
                        None => prop_assert_eq!(res, Ok(Insertion::Inserted)),
                    }
                    let load = sut.len() as f64 / sut.capacity() as f64;
                    prop_assert!(load <= config.resize_threshold, "load {} over threshold", load);
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    let removed = sut.remove(k);
                    match model.remove(k) {
                        Some(old) => {
                            prop_assert!(removed);
                            expected_released.push(old);
                        }
                        None => prop_assert!(!removed),
                    }
                }
                Op::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k));
                }
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains(&k), model.contains_key(&k));
                }
                Op::Mutate(i, d) => {
                    let k = &pool[i];
                    match (sut.get_mut(k), model.get_mut(k)) {
                        (Some(s), Some(m)) => {
                            *s = s.wrapping_add(d);
                            *m = m.wrapping_add(d);
                        }
                        (None, None) => {}
                        (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                    }
                }
                Op::Clear => {
                    let mut drained: Vec<i32> = model.drain().map(|(_, v)| v).collect();
                    let before = released.borrow().len();
                    sut.clear();
                    // Clear releases in slot order; compare as multisets.
                    let mut got: Vec<i32> = released.borrow()[before..].to_vec();
                    got.sort_unstable();
                    drained.sort_unstable();
                    prop_assert_eq!(&got, &drained);
                    expected_released.extend(released.borrow()[before..].iter().copied());
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.len());
            prop_assert!(sut.len() < sut.capacity());
            prop_assert!(sut.capacity() >= last_capacity, "capacity shrank");
            last_capacity = sut.capacity();
            prop_assert_eq!(&*released.borrow(), &expected_released);
            for (k, v) in model.iter() {
                prop_assert_eq!(sut.get(k), Some(v));
            }
        }

        // Drop releases whatever is left.
        let remaining = model.len();
        let before = released.borrow().len();
        drop(sut);
        prop_assert_eq!(released.borrow().len(), before + remaining);
    }
}

// Property: every key written survives any number of growth steps with its
// latest value, and `len` equals the number of distinct keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_membership(
        keys in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..12), 1..300),
        config in arb_config(),
    ) {
        let mut sut = ProbeTable::with_config(config).unwrap();
        let mut model: HashMap<Vec<u8>, usize> = HashMap::new();
        for (i, k) in keys.iter().enumerate() {
            sut.insert(k, i).unwrap();
            model.insert(k.clone(), i);
        }
        prop_assert_eq!(sut.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
        let mut seen = 0usize;
        for (k, v) in &sut {
            prop_assert_eq!(model.get(k), Some(v));
            seen += 1;
        }
        prop_assert_eq!(seen, model.len());
    }
}
