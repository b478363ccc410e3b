//! Key identity for `AdaptiveMap`.
//!
//! A comparer is fixed when a map is built and used by every tier, so the
//! inline single entry and the backing table always agree on which keys are
//! equal.

use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::RandomState;

/// Equality and hashing over keys of type `K`.
///
/// `hash` must agree with `eq`: keys that compare equal must hash equally.
/// A comparer may also designate some keys as null; maps reject null keys
/// on `add`, `set` and `remove`.
pub trait KeyComparer<K> {
    fn eq(&self, a: &K, b: &K) -> bool;

    fn hash(&self, key: &K) -> u64;

    /// Returns `true` if `key` stands for "no key". Defaults to `false`.
    #[inline]
    fn is_null(&self, _key: &K) -> bool {
        false
    }
}

/// `Eq` + `Hash` through a `BuildHasher`. The default comparer of every map.
#[derive(Clone, Debug, Default)]
pub struct DefaultComparer<S = RandomState> {
    hasher: S,
}

impl DefaultComparer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> DefaultComparer<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<K, S> KeyComparer<K> for DefaultComparer<S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }
}

/// ASCII case-insensitive comparison of string-like keys, as used for
/// property and metadata names.
#[derive(Clone, Debug, Default)]
pub struct IgnoreAsciiCase<S = RandomState> {
    hasher: S,
}

impl IgnoreAsciiCase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> IgnoreAsciiCase<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<K, S> KeyComparer<K> for IgnoreAsciiCase<S>
where
    K: AsRef<str>,
    S: BuildHasher,
{
    #[inline]
    fn eq(&self, a: &K, b: &K) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }

    fn hash(&self, key: &K) -> u64 {
        let mut h = self.hasher.build_hasher();
        for b in key.as_ref().bytes() {
            h.write_u8(b.to_ascii_lowercase());
        }
        // Terminator, same as `str`'s own Hash impl.
        h.write_u8(0xff);
        h.finish()
    }
}

/// Lifts a comparer over `T` to `Option<T>`, treating `None` as the null key.
#[derive(Clone, Debug, Default)]
pub struct NullableComparer<C = DefaultComparer> {
    inner: C,
}

impl<C> NullableComparer<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<T, C> KeyComparer<Option<T>> for NullableComparer<C>
where
    C: KeyComparer<T>,
{
    #[inline]
    fn eq(&self, a: &Option<T>, b: &Option<T>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.inner.eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    #[inline]
    fn hash(&self, key: &Option<T>) -> u64 {
        match key {
            Some(k) => self.inner.hash(k),
            None => 0,
        }
    }

    #[inline]
    fn is_null(&self, key: &Option<T>) -> bool {
        key.is_none()
    }
}
