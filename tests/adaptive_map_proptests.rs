// AdaptiveMap property tests (public API).
//
// Property 1: distinct adds.
//  - N adds of distinct keys give len() == N and every key maps to its value.
// Property 2: duplicate adds.
//  - A second add of any present key fails with DuplicateKey and changes
//    nothing.
// Property 3: set.
//  - set never fails on a non-null key; afterwards contains_key holds and
//    the new value is read back.
// Property 4: remove.
//  - Present key: true, len drops by one. Absent key: false, len unchanged.
// Property 5: round-trip.
//  - Re-adding every enumerated pair into a fresh map under the same
//    comparer yields an equal map.
use adaptive_map::{AdaptiveMap, MapError};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn distinct_entries() -> impl Strategy<Value = Vec<(String, i64)>> {
    proptest::collection::btree_map("[a-z]{1,4}", any::<i64>(), 0..24)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_distinct_adds_are_all_retrievable(entries in distinct_entries()) {
        let mut m = AdaptiveMap::new();
        for (n, (k, v)) in entries.iter().enumerate() {
            m.add(k.clone(), *v).unwrap();
            prop_assert_eq!(m.len(), n + 1);
        }
        for (k, v) in &entries {
            prop_assert_eq!(m.get(k), Ok(v));
        }
    }

    #[test]
    fn prop_duplicate_add_changes_nothing(entries in distinct_entries(), pick in any::<prop::sample::Index>(), v in any::<i64>()) {
        prop_assume!(!entries.is_empty());
        let mut m = AdaptiveMap::new();
        for (k, v) in &entries {
            m.add(k.clone(), *v).unwrap();
        }
        let (dup, _) = &entries[pick.index(entries.len())];
        prop_assert_eq!(m.add(dup.clone(), v), Err(MapError::DuplicateKey));
        prop_assert_eq!(m.len(), entries.len());
        for (k, v) in &entries {
            prop_assert_eq!(m.try_get(k), Some(v));
        }
    }

    #[test]
    fn prop_set_always_lands(entries in distinct_entries(), key in "[a-z]{1,4}", v in any::<i64>()) {
        let mut m: AdaptiveMap<String, i64> = entries.iter().cloned().collect();
        let before = m.len();
        let existed = m.contains_key(&key);
        prop_assert!(m.set(key.clone(), v).is_ok());
        prop_assert!(m.contains_key(&key));
        prop_assert_eq!(m.get(&key), Ok(&v));
        prop_assert_eq!(m.len(), if existed { before } else { before + 1 });
    }

    #[test]
    fn prop_remove_tracks_presence(entries in distinct_entries(), key in "[a-z]{1,4}") {
        let mut m: AdaptiveMap<String, i64> = entries.iter().cloned().collect();
        let before = m.len();
        let present = m.contains_key(&key);
        prop_assert_eq!(m.remove(&key), Ok(present));
        prop_assert_eq!(m.len(), if present { before - 1 } else { before });
        prop_assert!(!m.contains_key(&key));
    }

    #[test]
    fn prop_round_trip_preserves_mappings(entries in distinct_entries()) {
        let mut original = AdaptiveMap::new();
        for (k, v) in entries {
            original.add(k, v).unwrap();
        }

        let mut copy = AdaptiveMap::with_comparer(original.comparer().clone());
        for (k, v) in &original {
            copy.add(k.clone(), *v).unwrap();
        }

        prop_assert_eq!(&copy, &original);
        let a: BTreeSet<(String, i64)> = original.into_iter().collect();
        let b: BTreeSet<(String, i64)> = copy.into_iter().collect();
        prop_assert_eq!(a, b);
    }
}
