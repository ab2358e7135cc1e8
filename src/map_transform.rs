//! Filtering transforms and merges over key-value maps.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    hash::{BuildHasher, Hash},
};

use crate::{error::KeyCollision, target_map::TargetMap, tracing_support::trace_span};


/// Extension operations over key-value maps.
///
/// Every operation builds a new map of the same container kind and leaves
/// its inputs untouched, except the `into_` variants, which consume `self`
/// to avoid cloning. A transform returning `None` drops the entry; that is
/// filtering, not an error.
///
/// # Key collisions
///
/// When a key transform maps two entries to the same output key, the
/// lenient operations keep the entry visited last in the source map's
/// iteration order. For a `BTreeMap` that is the entry with the greatest
/// source key; for a `HashMap` it depends on the hasher. The `try_`
/// variants reject collisions with [`KeyCollision`] instead.
pub trait MapTransform<K, V>: Sized {
    /// The container kind that results are collected into.
    type Map<K1, V1>;

    /// Returns the number of entries.
    fn entry_count(&self) -> usize;

    /// Returns an iterator over borrowed entries.
    fn entries<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;

    /// Consumes the map, returning an iterator over its entries.
    fn into_entries(self) -> impl Iterator<Item = (K, V)>;

    /// Re-keys every entry with `transform`, dropping entries for which it
    /// returns `None`.
    fn map_keys_not_null<K1>(&self, mut transform: impl FnMut(&K) -> Option<K1>) -> Self::Map<K1, V>
    where
        V: Clone,
        Self::Map<K1, V>: TargetMap<K1, V>,
    {
        let _span = trace_span!("map_keys_not_null", entries = self.entry_count()).entered();
        TargetMap::from_entries(
            self.entry_count(),
            self.entries()
                .filter_map(|(key, value)| transform(key).map(|key| (key, value.clone()))),
        )
    }

    /// Like [`map_keys_not_null`](Self::map_keys_not_null), but fails if two
    /// entries end up with the same key.
    fn try_map_keys_not_null<K1>(
        &self,
        mut transform: impl FnMut(&K) -> Option<K1>,
    ) -> Result<Self::Map<K1, V>, KeyCollision<K1>>
    where
        K1: Debug,
        V: Clone,
        Self::Map<K1, V>: TargetMap<K1, V>,
    {
        let _span = trace_span!("try_map_keys_not_null", entries = self.entry_count()).entered();
        TargetMap::try_from_unique_entries(
            self.entry_count(),
            self.entries()
                .filter_map(|(key, value)| transform(key).map(|key| (key, value.clone()))),
        )
    }

    fn into_map_keys_not_null<K1>(self, mut transform: impl FnMut(&K) -> Option<K1>) -> Self::Map<K1, V>
    where
        Self::Map<K1, V>: TargetMap<K1, V>,
    {
        let _span = trace_span!("into_map_keys_not_null", entries = self.entry_count()).entered();
        let capacity = self.entry_count();
        TargetMap::from_entries(
            capacity,
            self.into_entries()
                .filter_map(|(key, value)| transform(&key).map(|key| (key, value))),
        )
    }

    fn try_into_map_keys_not_null<K1>(
        self,
        mut transform: impl FnMut(&K) -> Option<K1>,
    ) -> Result<Self::Map<K1, V>, KeyCollision<K1>>
    where
        K1: Debug,
        Self::Map<K1, V>: TargetMap<K1, V>,
    {
        let _span =
            trace_span!("try_into_map_keys_not_null", entries = self.entry_count()).entered();
        let capacity = self.entry_count();
        TargetMap::try_from_unique_entries(
            capacity,
            self.into_entries()
                .filter_map(|(key, value)| transform(&key).map(|key| (key, value))),
        )
    }

    /// Transforms every value, dropping entries for which `transform`
    /// returns `None`. Keys are carried over unchanged, so this never
    /// collides.
    fn map_values_not_null<V1>(&self, mut transform: impl FnMut(&V) -> Option<V1>) -> Self::Map<K, V1>
    where
        K: Clone,
        Self::Map<K, V1>: TargetMap<K, V1>,
    {
        let _span = trace_span!("map_values_not_null", entries = self.entry_count()).entered();
        TargetMap::from_entries(
            self.entry_count(),
            self.entries()
                .filter_map(|(key, value)| transform(value).map(|value| (key.clone(), value))),
        )
    }

    fn into_map_values_not_null<V1>(
        self,
        mut transform: impl FnMut(V) -> Option<V1>,
    ) -> Self::Map<K, V1>
    where
        Self::Map<K, V1>: TargetMap<K, V1>,
    {
        let _span = trace_span!("into_map_values_not_null", entries = self.entry_count()).entered();
        let capacity = self.entry_count();
        TargetMap::from_entries(
            capacity,
            self.into_entries()
                .filter_map(|(key, value)| transform(value).map(|value| (key, value))),
        )
    }

    /// Transforms keys and values together. An entry survives only if both
    /// transforms return `Some`; the value transform is not called for
    /// entries whose key transform already failed.
    fn map_not_null<K1, V1>(
        &self,
        mut key_transform: impl FnMut(&K) -> Option<K1>,
        mut value_transform: impl FnMut(&V) -> Option<V1>,
    ) -> Self::Map<K1, V1>
    where
        Self::Map<K1, V1>: TargetMap<K1, V1>,
    {
        let _span = trace_span!("map_not_null", entries = self.entry_count()).entered();
        TargetMap::from_entries(
            self.entry_count(),
            self.entries()
                .filter_map(|(key, value)| Some((key_transform(key)?, value_transform(value)?))),
        )
    }

    fn try_map_not_null<K1, V1>(
        &self,
        mut key_transform: impl FnMut(&K) -> Option<K1>,
        mut value_transform: impl FnMut(&V) -> Option<V1>,
    ) -> Result<Self::Map<K1, V1>, KeyCollision<K1>>
    where
        K1: Debug,
        Self::Map<K1, V1>: TargetMap<K1, V1>,
    {
        let _span = trace_span!("try_map_not_null", entries = self.entry_count()).entered();
        TargetMap::try_from_unique_entries(
            self.entry_count(),
            self.entries()
                .filter_map(|(key, value)| Some((key_transform(key)?, value_transform(value)?))),
        )
    }

    fn into_map_not_null<K1, V1>(
        self,
        mut key_transform: impl FnMut(&K) -> Option<K1>,
        mut value_transform: impl FnMut(V) -> Option<V1>,
    ) -> Self::Map<K1, V1>
    where
        Self::Map<K1, V1>: TargetMap<K1, V1>,
    {
        let _span = trace_span!("into_map_not_null", entries = self.entry_count()).entered();
        let capacity = self.entry_count();
        TargetMap::from_entries(
            capacity,
            self.into_entries()
                .filter_map(|(key, value)| Some((key_transform(&key)?, value_transform(value)?))),
        )
    }

    fn try_into_map_not_null<K1, V1>(
        self,
        mut key_transform: impl FnMut(&K) -> Option<K1>,
        mut value_transform: impl FnMut(V) -> Option<V1>,
    ) -> Result<Self::Map<K1, V1>, KeyCollision<K1>>
    where
        K1: Debug,
        Self::Map<K1, V1>: TargetMap<K1, V1>,
    {
        let _span = trace_span!("try_into_map_not_null", entries = self.entry_count()).entered();
        let capacity = self.entry_count();
        TargetMap::try_from_unique_entries(
            capacity,
            self.into_entries()
                .filter_map(|(key, value)| Some((key_transform(&key)?, value_transform(value)?))),
        )
    }

    /// Combines `self` with `defaults`. Keys present in only one map keep
    /// their value; for keys present in both, the value from `self` wins.
    fn merge_with(&self, defaults: &Self) -> Self::Map<K, V>
    where
        K: Clone,
        V: Clone,
        Self::Map<K, V>: TargetMap<K, V>,
    {
        self.merge_with_by(defaults, |primary, _| primary)
    }

    /// Combines `self` with `defaults`, resolving keys present in both with
    /// `merger(primary, default)`.
    fn merge_with_by(&self, defaults: &Self, merger: impl FnMut(V, V) -> V) -> Self::Map<K, V>
    where
        K: Clone,
        V: Clone,
        Self::Map<K, V>: TargetMap<K, V>,
    {
        let _span = trace_span!(
            "merge_with",
            entries = self.entry_count(),
            defaults = defaults.entry_count()
        )
        .entered();
        merge_entries(
            self.entry_count() + defaults.entry_count(),
            self.entries().map(|(key, value)| (key.clone(), value.clone())),
            defaults
                .entries()
                .map(|(key, value)| (key.clone(), value.clone())),
            merger,
        )
    }

    fn into_merge_with(self, defaults: Self) -> Self::Map<K, V>
    where
        Self::Map<K, V>: TargetMap<K, V>,
    {
        self.into_merge_with_by(defaults, |primary, _| primary)
    }

    fn into_merge_with_by(self, defaults: Self, merger: impl FnMut(V, V) -> V) -> Self::Map<K, V>
    where
        Self::Map<K, V>: TargetMap<K, V>,
    {
        let _span = trace_span!(
            "into_merge_with",
            entries = self.entry_count(),
            defaults = defaults.entry_count()
        )
        .entered();
        merge_entries(
            self.entry_count() + defaults.entry_count(),
            self.into_entries(),
            defaults.into_entries(),
            merger,
        )
    }
}

/// Seeds the result with `defaults`, then layers `primary` on top.
fn merge_entries<K, V, M>(
    capacity: usize,
    primary: impl Iterator<Item = (K, V)>,
    defaults: impl Iterator<Item = (K, V)>,
    mut merger: impl FnMut(V, V) -> V,
) -> M
where
    M: TargetMap<K, V>,
{
    let mut merged = M::with_capacity_hint(capacity);
    for (key, value) in defaults {
        merged.insert_entry(key, value);
    }
    for (key, value) in primary {
        let value = match merged.take(&key) {
            Some(default) => merger(value, default),
            None => value,
        };
        merged.insert_entry(key, value);
    }
    merged
}

impl<K, V, S> MapTransform<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    type Map<K1, V1> = HashMap<K1, V1, S>;

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.iter()
    }

    fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.into_iter()
    }
}

impl<K: Ord, V> MapTransform<K, V> for BTreeMap<K, V> {
    type Map<K1, V1> = BTreeMap<K1, V1>;

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn entries<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        self.iter()
    }

    fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.into_iter()
    }
}


#[cfg(test)]
mod btree_map_tests {
    use std::collections::BTreeMap;

    use super::*;

    map_transform_tests!(BTreeMap);

    #[test]
    fn test_collision_keeps_greatest_source_key() {
        let map = BTreeMap::from([(1, "one"), (3, "three"), (2, "two")]);
        let result = map.map_keys_not_null(|key| Some(key % 2));
        assert_eq!(result, BTreeMap::from([(0, "two"), (1, "three")]));
    }

    #[test]
    fn test_consuming_collision_matches_borrowing() {
        let map = BTreeMap::from([(1, "one"), (3, "three"), (2, "two")]);
        let borrowed = map.map_not_null(|key| Some(key % 2), |value| Some(value.len()));
        let consumed = map.into_map_not_null(|key| Some(key % 2), |value| Some(value.len()));
        assert_eq!(borrowed, consumed);
        assert_eq!(consumed, BTreeMap::from([(0, 3), (1, 5)]));
    }
}
