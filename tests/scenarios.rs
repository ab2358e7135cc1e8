use std::{
    collections::{BTreeMap, HashMap, hash_map::DefaultHasher},
    hash::BuildHasherDefault,
};

use map_transform::{MapTransform, tracing_support::init_tracing};

type DeterministicMap<K, V> = HashMap<K, V, BuildHasherDefault<DefaultHasher>>;

#[test]
fn merge_with_primary_wins() {
    init_tracing();
    let primary = HashMap::from([("a", 1), ("b", 2)]);
    let defaults = HashMap::from([("b", 99), ("c", 3)]);

    let merged = primary.merge_with(&defaults);

    assert_eq!(merged, HashMap::from([("a", 1), ("b", 2), ("c", 3)]));
    assert_eq!(primary, HashMap::from([("a", 1), ("b", 2)]));
    assert_eq!(defaults, HashMap::from([("b", 99), ("c", 3)]));
}

#[test]
fn merge_with_by_sums_shared_keys() {
    let primary = BTreeMap::from([("a", 1), ("b", 2)]);
    let defaults = BTreeMap::from([("b", 99), ("c", 3)]);

    let merged = primary.merge_with_by(&defaults, |p, d| p + d);

    assert_eq!(merged, BTreeMap::from([("a", 1), ("b", 101), ("c", 3)]));
}

#[test]
fn merge_with_by_passes_primary_first() {
    let primary = BTreeMap::from([("k", "primary")]);
    let defaults = BTreeMap::from([("k", "default")]);

    let merged = primary.into_merge_with_by(defaults, |p, d| if p < d { d } else { p });

    assert_eq!(merged["k"], "primary");
}

#[test]
fn parse_int_keys() {
    let map = HashMap::from([("1".to_string(), "x"), ("bad".to_string(), "y")]);

    let parsed = map.map_keys_not_null(|key| key.parse::<i32>().ok());

    assert_eq!(parsed, HashMap::from([(1, "x")]));
}

#[test]
fn result_keeps_the_source_hasher() {
    let mut map = DeterministicMap::default();
    map.insert("answer".to_string(), "42".to_string());
    map.insert("nothing".to_string(), "n/a".to_string());

    let parsed: DeterministicMap<String, u64> =
        map.map_values_not_null(|value| value.parse().ok());

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get("answer"), Some(&42));
}

#[test]
fn map_not_null_on_owned_values_moves_them() {
    let map = BTreeMap::from([
        (1, vec!["a".to_string()]),
        (2, Vec::new()),
        (3, vec!["c".to_string(), "d".to_string()]),
    ]);

    let firsts = map.into_map_not_null(
        |key| (*key != 3).then(|| key * 10),
        |values| values.into_iter().next(),
    );

    assert_eq!(firsts, BTreeMap::from([(10, "a".to_string())]));
}
