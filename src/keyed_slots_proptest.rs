#![cfg(test)]

// Property tests for KeyedSlots kept inside the crate; the type is not
// part of the public surface.

use crate::keyed_slots::{KeyedSlots, Slot};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, u16),
    Remove(usize),
    RemoveKey(usize),
    Get(usize),
    Bump(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=6).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            (idx.clone(), any::<u16>()).prop_map(|(i, v)| Op::Insert(i, v)),
            idx.clone().prop_map(Op::Remove),
            idx.clone().prop_map(Op::RemoveKey),
            idx.clone().prop_map(Op::Get),
            idx.clone().prop_map(Op::Bump),
            Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// State-machine equivalence against std::collections::HashMap:
// - inserts succeed exactly for absent keys; duplicates hand back the
//   rejected pair and leave the live entry alone;
// - slots stay valid while their entry lives and never resolve afterwards;
// - lookups, borrowed lookups and iteration agree with the model;
// - len/is_empty match the model after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_hashmap_model((pool, ops) in arb_scenario()) {
        let mut sut: KeyedSlots<String, u32> = KeyedSlots::default();
        let mut model: HashMap<String, u32> = HashMap::new();
        let mut live: HashMap<String, Slot> = HashMap::new();
        let mut dead: Vec<Slot> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = pool[i].clone();
                    match sut.insert(k.clone(), u32::from(v)) {
                        Ok(slot) => {
                            prop_assert!(!model.contains_key(&k));
                            model.insert(k.clone(), u32::from(v));
                            live.insert(k, slot);
                        }
                        Err((key, value)) => {
                            prop_assert_eq!(sut.find(k.as_str()), live.get(&k).copied());
                            prop_assert!(live.contains_key(&k));
                            prop_assert_eq!(sut.get(k.as_str()), model.get(&k));
                            prop_assert_eq!(key, k);
                            prop_assert_eq!(value, u32::from(v));
                        }
                    }
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    if let Some(slot) = live.remove(k) {
                        let (kk, vv) = sut.remove(slot).expect("live slot");
                        prop_assert_eq!(&kk, k);
                        prop_assert_eq!(Some(vv), model.remove(k));
                        dead.push(slot);
                    } else {
                        prop_assert!(sut.find(k.as_str()).is_none());
                    }
                }
                Op::RemoveKey(i) => {
                    let k = &pool[i];
                    let removed = sut.remove_key(k.as_str()).map(|(_, v)| v);
                    prop_assert_eq!(removed, model.remove(k));
                    if let Some(slot) = live.remove(k) {
                        dead.push(slot);
                    }
                }
                Op::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                    prop_assert_eq!(sut.find(k.as_str()), live.get(k).copied());
                }
                Op::Bump(i) => {
                    let k = &pool[i];
                    if let Some(v) = sut.get_mut(k.as_str()) {
                        *v += 1;
                        *model.get_mut(k).expect("model in sync") += 1;
                    } else {
                        prop_assert!(!model.contains_key(k));
                    }
                }
                Op::Iterate => {
                    let keys: BTreeSet<&String> = sut.iter().map(|(_, k, _)| k).collect();
                    prop_assert_eq!(keys, model.keys().collect::<BTreeSet<_>>());
                    for (slot, k, v) in sut.iter() {
                        prop_assert_eq!(live.get(k), Some(&slot));
                        prop_assert_eq!(model.get(k), Some(v));
                    }
                }
            }

            for slot in &dead {
                prop_assert!(sut.value(*slot).is_none());
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}
