#![cfg(test)]

// Property tests for AdaptiveMap kept inside the crate so they can check
// tier rules next to the observable behavior.

use crate::adaptive_map::{AdaptiveMap, Tier};
use crate::comparer::IgnoreAsciiCase;
use crate::error::MapError;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize, i32),
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Mutate(usize, i32),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-c]{1,3}", 1..=6).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Add(i, v)),
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            1 => (idx.clone(), -100i32..100).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Which tiers a map may legally be in after an operation, given whether it
// has been Full since the last clear.
fn expected_tier(len: usize, was_full: bool) -> Tier {
    match (len, was_full) {
        (_, true) => Tier::Full,
        (0, false) => Tier::Empty,
        (1, false) => Tier::Single,
        _ => Tier::Full,
    }
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `add` fails with DuplicateKey exactly when the key is present and leaves
//   the stored value untouched; `set` always succeeds and overwrites.
// - `remove` reports presence and removes exactly one entry.
// - `len`, `get`, `contains_key` and iteration match the model after each op.
// - Tier follows Empty -> Single -> Full and only `clear` leaves Full.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: AdaptiveMap<String, i32> = AdaptiveMap::new();
        let mut model: HashMap<String, i32> = HashMap::new();
        let mut was_full = false;

        for op in ops {
            match op {
                OpI::Add(i, v) => {
                    let k = pool[i].clone();
                    let already = model.contains_key(&k);
                    match sut.add(k.clone(), v) {
                        Ok(()) => {
                            prop_assert!(!already, "add must fail on duplicate");
                            model.insert(k, v);
                        }
                        Err(MapError::DuplicateKey) => {
                            prop_assert!(already, "duplicate error only when key exists");
                        }
                        Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                    }
                }
                OpI::Set(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.set(k.clone(), v);
                    prop_assert_eq!(prev, Ok(model.insert(k, v)));
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    let removed = sut.remove_entry(k).unwrap();
                    prop_assert_eq!(removed, model.remove_entry(k));
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.try_get(k), model.get(k));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
                    match sut.get(k) {
                        Ok(v) => prop_assert_eq!(Some(v), model.get(k)),
                        Err(e) => {
                            prop_assert_eq!(e, MapError::KeyNotFound);
                            prop_assert!(!model.contains_key(k));
                        }
                    }
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    if let Some(v) = sut.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(k) {
                        *v = v.wrapping_add(d);
                    }
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                    was_full = false;
                }
                OpI::Iterate => {
                    let seen: BTreeMap<String, i32> =
                        sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    let expected: BTreeMap<String, i32> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(seen, expected);
                    prop_assert_eq!(sut.iter().len(), model.len());
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            let tier = expected_tier(sut.len(), was_full);
            prop_assert_eq!(sut.tier(), tier);
            was_full = tier == Tier::Full;
        }
    }
}

// Property: rebuilding under a case-insensitive comparer succeeds exactly when
// no two keys fold to the same spelling, and then preserves every mapping.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_rebuild_collisions(entries in proptest::collection::vec(("[a-cA-C]{1,2}", any::<i32>()), 0..8)) {
        let mut sut: AdaptiveMap<String, i32> = AdaptiveMap::new();
        for (k, v) in entries {
            sut.set(k, v).unwrap();
        }

        let mut folded: HashMap<String, usize> = HashMap::new();
        for k in sut.keys() {
            *folded.entry(k.to_ascii_lowercase()).or_default() += 1;
        }
        let collides = folded.values().any(|&n| n > 1);

        match AdaptiveMap::try_from_map_with_comparer(&sut, IgnoreAsciiCase::new()) {
            Ok(rebuilt) => {
                prop_assert!(!collides);
                prop_assert_eq!(rebuilt.len(), sut.len());
                for (k, v) in &sut {
                    prop_assert_eq!(rebuilt.try_get(&k.to_ascii_uppercase()), Some(v));
                }
            }
            Err(e) => {
                prop_assert!(collides);
                prop_assert_eq!(e, MapError::DuplicateKey);
            }
        }
    }
}
