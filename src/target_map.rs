//! Result containers for map transforms.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    hash::{BuildHasher, Hash},
};

use crate::{
    error::KeyCollision,
    tracing_support::debug,
};

/// A map type that transform results can be collected into.
///
/// Every operation on [`MapTransform`](crate::MapTransform) builds a fresh
/// `TargetMap` of the same container kind as its input.
pub trait TargetMap<K, V>: Sized {
    /// Creates an empty map with room for about `capacity` entries.
    fn with_capacity_hint(capacity: usize) -> Self;

    /// Inserts an entry, returning the value it replaced, if any.
    fn insert_entry(&mut self, key: K, value: V) -> Option<V>;

    /// Removes and returns the value stored under `key`.
    fn take(&mut self, key: &K) -> Option<V>;

    fn contains(&self, key: &K) -> bool;

    /// Inserts an entry unless `key` is already present.
    fn insert_unique(&mut self, key: K, value: V) -> Result<(), KeyCollision<K>>
    where
        K: Debug,
    {
        if self.contains(&key) {
            return Err(KeyCollision::new(key));
        }
        self.insert_entry(key, value);
        Ok(())
    }

    /// Collects entries, letting later entries replace earlier ones with the
    /// same key.
    fn from_entries(capacity: usize, entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = Self::with_capacity_hint(capacity);
        let mut collisions = 0usize;
        for (key, value) in entries {
            if map.insert_entry(key, value).is_some() {
                collisions += 1;
            }
        }
        if collisions > 0 {
            debug!(collisions, "transformed keys collided; later entries replaced earlier ones");
        }
        map
    }

    /// Collects entries, failing on the first key seen twice.
    fn try_from_unique_entries(
        capacity: usize,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, KeyCollision<K>>
    where
        K: Debug,
    {
        let mut map = Self::with_capacity_hint(capacity);
        for (key, value) in entries {
            map.insert_unique(key, value)?;
        }
        Ok(map)
    }
}

impl<K, V, S> TargetMap<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn with_capacity_hint(capacity: usize) -> Self {
        HashMap::with_capacity_and_hasher(capacity, S::default())
    }

    fn insert_entry(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn take(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

// BTreeMap has no notion of capacity, so the hint is ignored.
impl<K: Ord, V> TargetMap<K, V> for BTreeMap<K, V> {
    fn with_capacity_hint(_capacity: usize) -> Self {
        BTreeMap::new()
    }

    fn insert_entry(&mut self, key: K, value: V) -> Option<V> {
        self.insert(key, value)
    }

    fn take(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_entries_last_write_wins() {
        let map: BTreeMap<u8, &str> =
            TargetMap::from_entries(3, [(1, "a"), (2, "b"), (1, "c")]);
        assert_eq!(map, BTreeMap::from([(1, "c"), (2, "b")]));
    }

    #[test]
    fn test_try_from_unique_entries_reports_duplicate() {
        let result: Result<HashMap<u8, &str>, _> =
            TargetMap::try_from_unique_entries(3, [(1, "a"), (2, "b"), (1, "c")]);
        assert_eq!(result.unwrap_err().into_key(), 1);
    }

    #[test]
    fn test_insert_unique_keeps_existing_value() {
        let mut map = HashMap::<&str, u8>::new();
        assert!(map.insert_unique("k", 1).is_ok());
        let err = map.insert_unique("k", 2).unwrap_err();
        assert_eq!(*err.key(), "k");
        assert_eq!(err.to_string(), "duplicate key after transform: \"k\"");
        assert_eq!(map.get("k"), Some(&1));
    }
}
