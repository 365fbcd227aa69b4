use std::collections::{BTreeMap, HashMap};

use drift_hash::{compute_hash, hash_value, HashValue};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::json;

#[test]
fn map_hash_ignores_insertion_order() {
    let forward = json!({"a": "1", "b": "2"});
    let reverse = json!({"b": "2", "a": "1"});
    assert_eq!(compute_hash(&forward).unwrap(), compute_hash(&reverse).unwrap());
    assert_eq!(
        compute_hash(&forward).unwrap(),
        "c6879d189ada98c7f4acce4fb0098741c582a53468b4387e2759c69c85845bcf"
    );
}

#[test]
fn hash_map_and_btree_map_agree() {
    let hashed: HashMap<&str, u32> = [("alpha", 1), ("beta", 2), ("gamma", 3)].into_iter().collect();
    let ordered: BTreeMap<&str, u32> = hashed.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(compute_hash(&hashed).unwrap(), compute_hash(&ordered).unwrap());
}

#[test]
fn sequence_hash_depends_on_order() {
    assert_eq!(
        compute_hash(&["a", "b"]).unwrap(),
        "62af5c3cb8da3e4f25061e829ebeea5c7513c54949115b1acc225930a90154da"
    );
    assert_ne!(compute_hash(&["a", "b"]).unwrap(), compute_hash(&["b", "a"]).unwrap());
}

#[test]
fn seeded_shuffles_keep_mapping_hash() {
    let entries: Vec<(HashValue, HashValue)> = (0..32i64)
        .map(|i| (HashValue::from(format!("key-{i}")), HashValue::from(i)))
        .collect();
    let baseline = hash_value(&HashValue::Mapping(entries.clone())).unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..8 {
        let mut shuffled = entries.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(hash_value(&HashValue::Mapping(shuffled)).unwrap(), baseline);
    }
}

proptest! {
    #[test]
    fn any_permutation_of_map_entries_hashes_alike(
        map in prop::collection::btree_map(".{0,8}", any::<u32>(), 0..12),
        seed in any::<u64>(),
    ) {
        let mut pairs: Vec<(HashValue, HashValue)> = map
            .iter()
            .map(|(k, v)| (HashValue::from(k.clone()), HashValue::from(u64::from(*v))))
            .collect();
        let baseline = compute_hash(&map).unwrap();
        pairs.shuffle(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(hash_value(&HashValue::Mapping(pairs)).unwrap(), baseline);
    }

    #[test]
    fn swapping_distinct_elements_changes_sequence_hash(
        a in "[a-z]{1,6}",
        b in "[A-Z]{1,6}",
    ) {
        prop_assert_ne!(compute_hash(&[&a, &b]).unwrap(), compute_hash(&[&b, &a]).unwrap());
    }

    #[test]
    fn hashing_is_deterministic(values in prop::collection::vec(any::<i64>(), 0..16)) {
        prop_assert_eq!(compute_hash(&values).unwrap(), compute_hash(&values.clone()).unwrap());
    }
}
