use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::hash_map::bucket_index;
use super::{AvlTree, ChainedHashMap};

const N: i32 = 1_000;
const LARGE_N: i32 = 1_000_000;

fn keys_in_order<V>(tree: &AvlTree<V>) -> Vec<i32> {
    tree.iter().map(|(&key, _)| key).collect()
}

fn root_key(tree: &AvlTree<i32>) -> Option<i64> {
    let json: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
    json["root"]["key"].as_i64()
}

#[test]
fn test_empty_containers() {
    let tree = AvlTree::<String>::default();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert!(tree.find(&0).is_none());
    tree.check_consistency();

    let map = ChainedHashMap::<String>::new(10).unwrap();
    assert!(map.is_empty());
    assert_eq!(map.bucket_count(), 10);
    assert_eq!(map.load_factor(), 0.0);
    assert!(map.find(&0).is_none());
}

#[test]
fn test_rotation_cases() {
    // (insert order, key removed afterwards, expected root key, height)
    let cases: [(&[i32], Option<i32>, i32, usize); 8] = [
        // left-left, single right rotation
        (&[30, 20, 10], None, 20, 2),
        // left-right, left child rotated left first
        (&[30, 10, 20], None, 20, 2),
        // right-right, single left rotation
        (&[10, 20, 30], None, 20, 2),
        // right-left, right child rotated right first
        (&[10, 30, 20], None, 20, 2),
        // removal leaves the root left heavy
        (&[30, 20, 40, 10], Some(40), 20, 2),
        (&[30, 10, 40, 20], Some(40), 20, 2),
        // removal leaves the root right heavy
        (&[10, 0, 20, 30], Some(0), 20, 2),
        (&[10, 0, 30, 20], Some(0), 20, 2),
    ];

    for (order, removed, middle, height) in cases {
        let mut tree = AvlTree::new();
        for key in order {
            tree.insert(*key, *key * 2);
            tree.check_consistency();
        }
        if let Some(key) = removed {
            assert_eq!(tree.remove(&key), Some(key * 2));
            tree.check_consistency();
        }
        assert_eq!(tree.height(), height, "order {:?}", order);
        assert_eq!(root_key(&tree), Some(i64::from(middle)), "order {:?}", order);
        assert_eq!(tree.find(&middle), Some(&(middle * 2)));
    }
}

#[test]
fn test_balanced_insert_order() {
    let mut tree = AvlTree::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        assert!(tree.insert(key, key.to_string()).is_none());
        tree.check_consistency();
    }
    assert_eq!(tree.height(), 3);
    assert_eq!(keys_in_order(&tree), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.find(&4).map(String::as_str), Some("4"));
}

#[test]
fn test_duplicate_key_keeps_one_entry() {
    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(8).unwrap();

    assert_eq!(tree.insert(10, "a"), None);
    assert_eq!(map.insert(10, "a"), None);
    assert_eq!(tree.insert(10, "b"), Some("a"));
    assert_eq!(map.insert(10, "b"), Some("a"));

    assert_eq!(tree.find(&10), Some(&"b"));
    assert_eq!(map.find(&10), Some(&"b"));
    assert_eq!(tree.len(), 1);
    assert_eq!(map.len(), 1);
    assert_eq!(tree.iter().count(), 1);
}

#[test]
fn test_colliding_keys() {
    let mut map = ChainedHashMap::new(4).unwrap();
    let keys = [1, 5, 9, -1, -5];
    for key in keys {
        assert_eq!(bucket_index(key, 4), 1);
        map.insert(key, key * 100);
    }
    for key in keys {
        assert_eq!(map.find(&key), Some(&(key * 100)));
    }

    // chain is -5 -> -1 -> 9 -> 5 -> 1, unlink middle, head and tail
    assert_eq!(map.remove(&5), Some(500));
    assert_eq!(map.remove(&-5), Some(-500));
    assert_eq!(map.remove(&1), Some(100));
    assert!(map.find(&5).is_none());
    assert!(map.find(&-5).is_none());
    assert!(map.find(&1).is_none());
    assert_eq!(map.find(&9), Some(&900));
    assert_eq!(map.find(&-1), Some(&-100));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_remove_root_takes_successor() {
    let mut tree = AvlTree::new();
    for key in [50, 30, 70, 20, 40, 60, 80, 65] {
        tree.insert(key, key + 1);
    }
    assert_eq!(root_key(&tree), Some(50));

    // successor of 50 is the leftmost key of the right subtree
    assert_eq!(tree.remove(&50), Some(51));
    tree.check_consistency();
    assert_eq!(root_key(&tree), Some(60));
    assert_eq!(tree.find(&60), Some(&61));
    assert!(tree.find(&50).is_none());
    assert_eq!(keys_in_order(&tree), [20, 30, 40, 60, 65, 70, 80]);
}

#[test]
fn test_monotonic_inserts_stay_shallow() {
    let mut ascending = AvlTree::new();
    let mut descending = AvlTree::new();
    for key in 0..N {
        ascending.insert(key, ());
        descending.insert(-key, ());
    }
    ascending.check_consistency();
    descending.check_consistency();

    // an AVL tree with n nodes is at most about 1.44 * log2(n) high
    let bound = (1.45 * (N as f64).log2()).ceil() as usize;
    assert!(ascending.height() <= bound);
    assert!(descending.height() <= bound);
    assert_eq!(ascending.len(), N as usize);
}

#[test]
fn test_random_ops_match_btree_map() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut expected = BTreeMap::new();
    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(17).unwrap();

    for step in 0..4 * N {
        let key = rng.gen_range(-N / 4..N / 4);
        if rng.gen_bool(0.6) {
            assert_eq!(tree.insert(key, step), expected.get(&key).copied());
            assert_eq!(map.insert(key, step), expected.insert(key, step));
        } else {
            let removed = expected.remove(&key);
            assert_eq!(tree.remove(&key), removed);
            assert_eq!(map.remove(&key), removed);
        }
        tree.check_consistency();
    }

    assert_eq!(tree.len(), expected.len());
    assert_eq!(map.len(), expected.len());
    let entries: Vec<(i32, i32)> = tree.iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(entries, expected.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>());
    for (key, value) in &expected {
        assert_eq!(map.find(key), Some(value));
    }
}

#[test]
fn test_drain_both_containers() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<i32> = (0..N).map(|_| rng.gen_range(-N..=N)).collect();
    keys.sort();
    keys.dedup();

    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(N as usize / 10).unwrap();
    for key in &keys {
        tree.insert(*key, *key);
        map.insert(*key, *key);
    }

    keys.shuffle(&mut rng);
    for key in &keys {
        assert_eq!(tree.remove(key), Some(*key));
        assert_eq!(map.remove(key), Some(*key));
        assert!(!tree.contains_key(key));
        assert!(!map.contains_key(key));
    }
    tree.check_consistency();
    assert!(tree.is_empty());
    assert!(map.is_empty());

    // both are reusable after being emptied
    tree.insert(1, 1);
    map.insert(1, 1);
    assert_eq!(tree.find(&1), map.find(&1));
}

#[test]
fn test_remove_absent_is_noop() {
    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(4).unwrap();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        tree.insert(key, key);
        map.insert(key, key);
    }
    let tree_json = tree.to_json().unwrap();
    let map_json = map.to_json().unwrap();

    assert!(tree.remove(&6).is_none());
    assert!(map.remove(&6).is_none());
    assert!(map.remove(&13).is_none());

    assert_eq!(tree.to_json().unwrap(), tree_json);
    assert_eq!(map.to_json().unwrap(), map_json);
    assert_eq!(tree.len(), 7);
    assert_eq!(map.len(), 7);
}

#[test]
fn test_clear_then_refill() {
    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(3).unwrap();
    for key in 0..100 {
        tree.insert(key, String::from("first"));
        map.insert(key, String::from("first"));
    }
    tree.clear();
    map.clear();
    assert!(tree.is_empty() && map.is_empty());
    assert_eq!(map.bucket_count(), 3);

    for key in 0..100 {
        assert!(tree.insert(key, String::from("second")).is_none());
        assert!(map.insert(key, String::from("second")).is_none());
    }
    tree.check_consistency();
    assert_eq!(map.find(&42).map(String::as_str), Some("second"));
}

#[test]
#[ignore]
fn test_large() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut keys: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

    let mut tree = AvlTree::new();
    let mut map = ChainedHashMap::new(LARGE_N as usize / 4).unwrap();
    for key in &keys {
        tree.insert(*key, *key);
        map.insert(*key, *key);
    }
    tree.check_consistency();
    assert_eq!(tree.len(), map.len());

    keys.shuffle(&mut rng);
    keys.truncate(keys.len() / 2);
    for key in &keys {
        tree.remove(key);
        map.remove(key);
    }
    tree.check_consistency();
    assert_eq!(tree.len(), map.len());
}
