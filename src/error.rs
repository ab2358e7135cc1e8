use std::fmt::Debug;

/// Returned by the strict `try_` operations of
/// [`MapTransform`](crate::MapTransform) when two surviving entries produce
/// the same output key.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("duplicate key after transform: {key:?}")]
pub struct KeyCollision<K: Debug> {
    key: K,
}

impl<K: Debug> KeyCollision<K> {
    pub(crate) fn new(key: K) -> Self {
        Self { key }
    }

    /// The output key that more than one entry mapped to.
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }
}
