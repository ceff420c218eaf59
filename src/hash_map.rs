//! A hash map over `i32` keys with a fixed number of buckets, each a singly
//! linked chain of entries.
//!
//! The bucket count is chosen at construction and never changes, so the load
//! factor grows with the number of entries and chains get longer. Lookups are
//! O(1) on average only while `len() / bucket_count()` stays small.

use std::iter;
use std::mem;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::ToJson;
use crate::Key;

/// Maps a key to a nonnegative hash by taking its absolute value.
///
/// `i32::MIN` has no positive `i32` counterpart and hashes to `2^31`.
pub fn hash(key: Key) -> u32 {
    key.unsigned_abs()
}

/// Returns the bucket a key belongs to, always in `0..bucket_count`.
///
/// `bucket_count` must be greater than zero.
pub fn bucket_index(key: Key, bucket_count: usize) -> usize {
    hash(key) as usize % bucket_count
}

/// A chained hash map with a fixed bucket count.
///
/// ```
/// use tree_and_map::ChainedHashMap;
/// let mut map = ChainedHashMap::new(4).unwrap();
/// map.insert(1, "one");
/// map.insert(5, "five");
/// assert_eq!(map.find(&5), Some(&"five"));
/// map.remove(&5);
/// assert!(map.find(&5).is_none());
/// assert_eq!(map.find(&1), Some(&"one"));
/// ```
pub struct ChainedHashMap<V> {
    buckets: Vec<Link<V>>,
    len: usize,
}

/// A node that lives in a bucket chain.
struct Entry<V> {
    key: Key,
    value: V,

    /// The next entry in the same bucket.
    next: Link<V>,
}

type Link<V> = Option<Box<Entry<V>>>;

impl<V> ChainedHashMap<V> {
    /// Makes a new map with a fixed number of buckets.
    pub fn new(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(Error::ZeroBuckets);
        }
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, || None);
        Ok(Self { buckets, len: 0 })
    }

    /// The number of entries stored in the map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of buckets, fixed at construction.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Average chain length, entries per bucket.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Gets the value stored for a key.
    pub fn find(&self, key: &Key) -> Option<&V> {
        let mut current = self.buckets[self.index_of(*key)].as_deref();
        while let Some(entry) = current {
            if entry.key == *key {
                return Some(&entry.value);
            }
            current = entry.next.as_deref();
        }
        None
    }

    /// Gets a mutable reference to the value stored for a key.
    pub fn find_mut(&mut self, key: &Key) -> Option<&mut V> {
        let index = self.index_of(*key);
        let mut current = self.buckets[index].as_deref_mut();
        while let Some(entry) = current {
            if entry.key == *key {
                return Some(&mut entry.value);
            }
            current = entry.next.as_deref_mut();
        }
        None
    }

    /// Returns true if the map holds a value for the key.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair. Returns the previous value if the key already
    /// had one, which is overwritten in place. New keys are prepended to the
    /// chain of their bucket.
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        let index = self.index_of(key);

        let mut current = self.buckets[index].as_deref_mut();
        while let Some(entry) = current {
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }
            current = entry.next.as_deref_mut();
        }

        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry {
            key,
            value,
            next: head,
        }));
        self.len += 1;
        None
    }

    /// Removes a key, returning its value if it was in the map.
    pub fn remove(&mut self, key: &Key) -> Option<V> {
        let index = self.index_of(*key);

        // walk the link that points at the matching entry, either the bucket
        // head or the `next` of its predecessor
        let mut link = &mut self.buckets[index];
        while link.as_ref().is_some_and(|entry| entry.key != *key) {
            link = &mut link.as_mut()?.next;
        }

        let removed = link.take()?;
        let Entry { value, next, .. } = *removed;
        *link = next;
        self.len -= 1;
        Some(value)
    }

    /// Removes all entries. The bucket count is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            // unlink one entry at a time, dropping a long chain recursively
            // could exhaust the stack
            let mut link = bucket.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
        self.len = 0;
    }

    fn index_of(&self, key: Key) -> usize {
        bucket_index(key, self.buckets.len())
    }
}

impl<V: Serialize> ChainedHashMap<V> {
    /// Serializes the bucket array with its chains to JSON.
    ///
    /// Every entry nests its successor under `next`, the last entry of a chain
    /// has no `next` field. Empty buckets are written as `null` to keep bucket
    /// positions. Chains are written in a loop, so their length is not limited
    /// by the stack; the output is compact since indenting nested entries would
    /// grow quadratically with chain length.
    pub fn to_json(&self) -> Result<String> {
        let mut json = String::from("{\"buckets\":[");
        for (index, bucket) in self.buckets.iter().enumerate() {
            if index > 0 {
                json.push(',');
            }
            if bucket.is_none() {
                json.push_str("null");
                continue;
            }

            // open one object per entry, close them all once the chain ends
            let mut depth = 0;
            let mut current = bucket.as_deref();
            while let Some(entry) = current {
                if depth > 0 {
                    json.push_str(",\"next\":");
                }
                json.push_str("{\"key\":");
                json.push_str(&entry.key.to_string());
                json.push_str(",\"value\":");
                let value = serde_json::to_string(&entry.value).map_err(|source| {
                    Error::Serialize {
                        container: "hash map",
                        source,
                    }
                })?;
                json.push_str(&value);
                depth += 1;
                current = entry.next.as_deref();
            }
            json.extend(iter::repeat('}').take(depth));
        }
        json.push_str("]}");
        Ok(json)
    }
}

impl<V: Serialize> ToJson for ChainedHashMap<V> {
    fn to_json(&self) -> Result<String> {
        ChainedHashMap::to_json(self)
    }
}

impl<V> Drop for ChainedHashMap<V> {
    fn drop(&mut self) {
        self.clear();
    }
}
