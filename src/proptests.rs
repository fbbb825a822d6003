use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_tree<V>(t: &Trie<V>, expected_len: usize) {
    t.assert_compact();
    assert_eq!(t.size(), expected_len, "visited entries must match the reference map");
    assert_eq!(t.is_empty(), expected_len == 0);
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u64),
    Set(Vec<u8>, u64),
    Delete(Vec<u8>),
    DeleteSubtree(Vec<u8>),
    Get(Vec<u8>),
}

fn short_key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Small alphabet so keys share prefixes often.
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', 0x00, 0xff]), 1..=12)
}

fn long_key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Long shared runs exercise label chains and the 32 byte limit.
    (0usize..3, 0u8..4, prop::collection::vec(0u8..3, 0..=8)).prop_map(|(run, fill, tail)| {
        let mut key = vec![fill; run * 24 + 1];
        key.extend(tail);
        key
    })
}

fn ops_strategy(key: impl Strategy<Value = Vec<u8>> + Clone) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        35 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        15 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Set(k, v)),
        30 => key.clone().prop_map(Op::Delete),
        3 => key.clone().prop_map(Op::DeleteSubtree),
        17 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=400)
}

fn digest_strategy() -> impl Strategy<Value = [u8; KEY_LEN]> {
    // Digests sharing their first bytes, as in a busy prefix of a real index.
    (0u8..4, any::<[u8; KEY_LEN]>()).prop_map(|(shared, mut digest)| {
        for b in digest.iter_mut().take(usize::from(shared)) {
            *b = 0x5a;
        }
        digest
    })
}

fn run_ops(config: TrieConfig, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut t: Trie<u64> = Trie::with_config(config).unwrap();
    let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(key, value) => {
                let inserted = t.insert(&key, value).unwrap();
                let absent = !m.contains_key(&key);
                prop_assert_eq!(inserted, absent);
                m.entry(key).or_insert(value);
            }
            Op::Set(key, value) => {
                let old_t = t.set(&key, value).unwrap();
                let old_m = m.insert(key, value);
                prop_assert_eq!(old_t, old_m);
            }
            Op::Delete(key) => {
                let old_t = t.remove(&key).unwrap();
                let old_m = m.remove(&key);
                prop_assert_eq!(old_t, old_m);
            }
            Op::DeleteSubtree(prefix) => {
                let doomed: Vec<Vec<u8>> = m.keys().filter(|k| k.starts_with(&prefix)).cloned().collect();
                let matched = t.delete_subtree(&prefix).unwrap();
                prop_assert_eq!(matched, !doomed.is_empty());
                for k in doomed {
                    m.remove(&k);
                }
            }
            Op::Get(key) => {
                prop_assert_eq!(t.get(&key).unwrap().copied(), m.get(&key).copied());
                let in_subtree = m.keys().any(|k| k.starts_with(&key));
                prop_assert_eq!(t.match_subtree(&key).unwrap(), in_subtree);
            }
        }
        validate_tree(&t, m.len());
    }

    let expected: Vec<(Vec<u8>, u64)> = m.into_iter().collect();
    prop_assert_eq!(t.entries(), expected);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_short_keys(ops in ops_strategy(short_key_strategy())) {
        run_ops(TrieConfig::default(), ops)?;
    }

    #[test]
    fn prop_equivalence_long_keys(ops in ops_strategy(long_key_strategy())) {
        run_ops(TrieConfig::default(), ops)?;
    }

    #[test]
    fn prop_equivalence_tiny_labels(ops in ops_strategy(short_key_strategy())) {
        // Labels of at most 2 bytes force chains everywhere.
        run_ops(TrieConfig { max_prefix_len: 2, sparse_capacity: 2 }, ops)?;
    }

    #[test]
    fn prop_sparse_dense_equivalence(keys in prop::collection::vec(digest_strategy(), 0..300)) {
        let eager = TrieConfig { sparse_capacity: 1, ..TrieConfig::default() };
        let lazy = TrieConfig { sparse_capacity: 1024, ..TrieConfig::default() };
        let mut dense: Trie = Trie::with_config(eager).unwrap();
        let mut sparse: Trie = Trie::with_config(lazy).unwrap();

        for (i, k) in keys.iter().enumerate() {
            let loc = Locator::new(i as u64, i as u64);
            prop_assert_eq!(dense.insert(k, loc).unwrap(), sparse.insert(k, loc).unwrap());
        }
        prop_assert_eq!(dense.entries(), sparse.entries());

        for k in keys.iter().step_by(2) {
            prop_assert_eq!(dense.delete(k).unwrap(), sparse.delete(k).unwrap());
        }
        dense.assert_compact();
        sparse.assert_compact();
        prop_assert_eq!(dense.entries(), sparse.entries());
    }

    #[test]
    fn prop_codec_round_trip(keys in prop::collection::vec(digest_strategy(), 0..300)) {
        let mut t = Trie::new();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, Locator::new(i as u64 * 64, 64)).unwrap();
        }
        let back = unmarshal(&marshal(&t).unwrap()).unwrap();
        back.assert_compact();
        prop_assert_eq!(back.entries(), t.entries());
    }

    #[test]
    fn prop_insert_then_delete_restores_empty(keys in prop::collection::vec(long_key_strategy(), 1..50)) {
        let mut t: Trie<u64> = Trie::new();
        let fresh = t.dump();
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as u64).unwrap();
        }
        for k in keys.iter().rev() {
            t.delete(k).unwrap();
            t.assert_compact();
        }
        prop_assert!(t.is_empty());
        prop_assert_eq!(t.dump(), fresh);
    }
}

/// All orderings of `items`, in lexicographic order of their positions.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    (0..items.len())
        .flat_map(|i| {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            permutations(&rest).into_iter().map(move |mut tail| {
                tail.insert(0, head.clone());
                tail
            })
        })
        .collect()
}

fn small_set() -> Vec<Vec<u8>> {
    vec![
        b"a".to_vec(),
        b"b".to_vec(),
        b"ab".to_vec(),
        b"abc".to_vec(),
        b"abd".to_vec(),
        b"ba".to_vec(),
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_set();
    for config in [TrieConfig::default(), TrieConfig { max_prefix_len: 1, sparse_capacity: 1 }] {
        for perm in permutations(&keys) {
            let mut t: Trie<u64> = Trie::with_config(config).unwrap();
            let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

            for (i, k) in perm.into_iter().enumerate() {
                let v = i as u64;
                assert!(t.insert(&k, v).unwrap());
                m.insert(k, v);
                t.assert_compact();
            }

            let expected: Vec<(Vec<u8>, u64)> = m.into_iter().collect();
            assert_eq!(t.entries(), expected);
        }
    }
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = small_set();

    // Insert in a fixed order, then remove in all permutations.
    let mut base_tree: Trie<u64> = Trie::new();
    let mut base_map: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        let v = i as u64;
        assert!(base_tree.insert(k, v).unwrap());
        base_map.insert(k.clone(), v);
    }
    let fresh = Trie::<u64>::new().dump();

    let orders = permutations(&keys);
    assert_eq!(orders.len(), 720);
    for perm in orders {
        let mut t = base_tree.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(&k).unwrap(), m.remove(&k));
            validate_tree(&t, m.len());
        }
        assert!(t.is_empty());
        assert_eq!(t.dump(), fresh);
    }
}
