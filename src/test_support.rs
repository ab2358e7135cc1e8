#![cfg(test)]

use quickcheck::{Arbitrary, Gen};

use crate::{MapTransform, target_map::TargetMap};

/// A primary map and a defaults map that are guaranteed to share some keys,
/// so merge properties exercise the conflict path rather than relying on
/// random overlap.
#[derive(Clone, Debug)]
pub struct ArbOverlapping<M> {
    pub primary: M,
    pub defaults: M,
}

impl<M> Arbitrary for ArbOverlapping<M>
where
    M: Arbitrary + MapTransform<u8, u8> + TargetMap<u8, u8>,
{
    fn arbitrary(g: &mut Gen) -> Self {
        let primary = M::arbitrary(g);
        let mut defaults = M::arbitrary(g);
        let shared: Vec<u8> = primary
            .entries()
            .map(|(key, _)| *key)
            .filter(|_| bool::arbitrary(g))
            .collect();
        for key in shared {
            defaults.insert_entry(key, u8::arbitrary(g));
        }
        ArbOverlapping { primary, defaults }
    }
}

pub fn parse_key(key: &String) -> Option<i32> {
    key.parse().ok()
}

pub fn half_if_even(value: &u8) -> Option<u8> {
    (value % 2 == 0).then(|| value / 2)
}
