//! AdaptiveMap: a key-unique map that stores zero or one entries inline and
//! moves to a hash table on the second distinct key.
//!
//! Storage is one of three tiers:
//! - `Empty`: nothing stored, nothing allocated.
//! - `Single`: one `Pair` stored inline, nothing allocated.
//! - `Full`: a `BackingMap` holding any number of entries.
//!
//! Growth only moves forward (Empty -> Single -> Full). Removing the inline
//! entry returns to Empty; `clear` returns to Empty from any tier. A Full map
//! stays Full however small it gets.

use crate::backing_map::BackingMap;
use crate::comparer::{DefaultComparer, KeyComparer};
use crate::error::MapError;
use crate::iter::{IntoIter, IntoKeys, IntoValues, Iter, IterMut, Keys, Values, ValuesMut};
use crate::pair::Pair;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;
use log::trace;

// Backing map size right after promotion: the inline entry plus the new one.
const PROMOTED_CAPACITY: usize = 2;

/// The storage representation a map is currently using.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Tier {
    Empty,
    Single,
    Full,
}

#[derive(Clone)]
enum Storage<K, V> {
    Empty,
    Single(Pair<K, V>),
    Full(BackingMap<K, V>),
}

/// A map optimized for holding zero or one entries.
///
/// Behaves like a regular key-unique hash map. The comparer `C` defines key
/// identity in every tier and cannot be changed after construction; use
/// [`AdaptiveMap::try_rebuild_with`] to re-key a map under another one.
pub struct AdaptiveMap<K, V, C = DefaultComparer> {
    storage: Storage<K, V>,
    comparer: C,
}

impl<K, V> AdaptiveMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer::new())
    }

    /// A `capacity` above one allocates the backing map up front and skips
    /// the single-entry tier.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparer(capacity, DefaultComparer::new())
    }
}

impl<K, V, C> AdaptiveMap<K, V, C> {
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            storage: Storage::Empty,
            comparer,
        }
    }

    pub fn with_capacity_and_comparer(capacity: usize, comparer: C) -> Self {
        let storage = if capacity > 1 {
            trace!("adaptive map pre-sized to full tier, capacity {}", capacity);
            Storage::Full(BackingMap::with_capacity(capacity))
        } else {
            Storage::Empty
        };
        Self { storage, comparer }
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    pub fn tier(&self) -> Tier {
        match self.storage {
            Storage::Empty => Tier::Empty,
            Storage::Single(_) => Tier::Single,
            Storage::Full(_) => Tier::Full,
        }
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Empty => 0,
            Storage::Single(_) => 1,
            Storage::Full(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.storage {
            Storage::Empty => true,
            Storage::Single(_) => false,
            Storage::Full(map) => map.is_empty(),
        }
    }

    /// Drops every entry and any backing allocation.
    pub fn clear(&mut self) {
        if let Storage::Full(_) = self.storage {
            trace!("adaptive map cleared, releasing backing map");
        }
        self.storage = Storage::Empty;
    }

    /// Takes every entry out, leaving the map Empty.
    pub fn drain(&mut self) -> IntoIter<K, V> {
        Self::into_iter_of(mem::replace(&mut self.storage, Storage::Empty))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        match &self.storage {
            Storage::Empty => Iter::inline(None),
            Storage::Single(pair) => Iter::inline(Some(pair)),
            Storage::Full(map) => Iter::full(map.iter()),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        match &mut self.storage {
            Storage::Empty => IterMut::inline(None),
            Storage::Single(pair) => IterMut::inline(Some(pair)),
            Storage::Full(map) => IterMut::full(map.iter_mut()),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }

    /// Keeps only the entries for which `f` returns `true`. A Full map stays Full.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        match self.storage {
            Storage::Empty => {}
            Storage::Single(ref mut pair) => {
                let (k, v) = pair.parts_mut();
                if !f(k, v) {
                    self.storage = Storage::Empty;
                }
            }
            Storage::Full(ref mut map) => map.retain(f),
        }
    }

    fn into_iter_of(storage: Storage<K, V>) -> IntoIter<K, V> {
        match storage {
            Storage::Empty => IntoIter::inline(None),
            Storage::Single(pair) => IntoIter::inline(Some(pair)),
            Storage::Full(map) => IntoIter::full(map.into_iter()),
        }
    }

    fn take_single(&mut self) -> Option<Pair<K, V>> {
        match mem::replace(&mut self.storage, Storage::Empty) {
            Storage::Single(pair) => Some(pair),
            other => {
                self.storage = other;
                None
            }
        }
    }
}

impl<K, V, C> AdaptiveMap<K, V, C>
where
    C: KeyComparer<K>,
{
    /// Copies `source` into a new map keyed by `comparer`.
    ///
    /// Entries are re-added one by one, so keys that were distinct under the
    /// source's comparer but equal under `comparer` fail with `DuplicateKey`.
    pub fn try_from_map_with_comparer<C2>(
        source: &AdaptiveMap<K, V, C2>,
        comparer: C,
    ) -> Result<Self, MapError>
    where
        K: Clone,
        V: Clone,
    {
        let mut map = Self::with_capacity_and_comparer(source.len(), comparer);
        for (k, v) in source {
            map.add(k.clone(), v.clone())?;
        }
        Ok(map)
    }

    /// Builds a map from `iter` with strict `add` semantics.
    pub fn try_from_iter_with_comparer<I>(iter: I, comparer: C) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity_and_comparer(iter.size_hint().0, comparer);
        for (k, v) in iter {
            map.add(k, v)?;
        }
        Ok(map)
    }

    /// Consumes the map and re-keys its entries under `comparer`, failing
    /// with `DuplicateKey` on the first collision.
    pub fn try_rebuild_with<C2>(self, comparer: C2) -> Result<AdaptiveMap<K, V, C2>, MapError>
    where
        C2: KeyComparer<K>,
    {
        AdaptiveMap::try_from_iter_with_comparer(self, comparer)
    }

    fn check_key(&self, key: &K) -> Result<(), MapError> {
        if self.comparer.is_null(key) {
            Err(MapError::InvalidArgument)
        } else {
            Ok(())
        }
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        if self.comparer.is_null(key) {
            return None;
        }
        match &self.storage {
            Storage::Empty => None,
            Storage::Single(pair) => self
                .comparer
                .eq(pair.key(), key)
                .then(|| (pair.key(), pair.value())),
            Storage::Full(map) => map.get_key_value(&self.comparer, key),
        }
    }

    /// Looks up `key`; `None` means absent, never "present with an empty value".
    pub fn try_get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get(&self, key: &K) -> Result<&V, MapError> {
        self.try_get(key).ok_or(MapError::KeyNotFound)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.comparer.is_null(key) {
            return None;
        }
        match &mut self.storage {
            Storage::Empty => None,
            Storage::Single(pair) => {
                if self.comparer.eq(pair.key(), key) {
                    Some(pair.value_mut())
                } else {
                    None
                }
            }
            Storage::Full(map) => map.get_mut(&self.comparer, key),
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.try_get(key).is_some()
    }

    /// `true` if the pair's key is present and maps to an equal value.
    pub fn contains(&self, pair: &Pair<K, V>) -> bool
    where
        V: PartialEq,
    {
        self.contains_entry(pair.key(), pair.value())
    }

    pub fn contains_entry(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.try_get(key).map_or(false, |v| v == value)
    }

    /// Strict insert. Fails with `DuplicateKey` if `key` is present, leaving
    /// the existing value in place.
    pub fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        self.check_key(&key)?;
        match self.storage {
            Storage::Empty => {
                self.storage = Storage::Single(Pair::new(key, value));
            }
            Storage::Single(ref pair) => {
                if self.comparer.eq(pair.key(), &key) {
                    return Err(MapError::DuplicateKey);
                }
                let first_hash = self.comparer.hash(pair.key());
                self.promote(first_hash, key, value);
            }
            Storage::Full(ref mut map) => map.insert(&self.comparer, key, value)?,
        }
        Ok(())
    }

    /// Insert-or-overwrite, the indexer write. Returns the replaced value.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        self.check_key(&key)?;
        Ok(self.upsert(key, value))
    }

    fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.storage {
            Storage::Empty => {
                self.storage = Storage::Single(Pair::new(key, value));
                None
            }
            Storage::Single(ref mut pair) => {
                if self.comparer.eq(pair.key(), &key) {
                    return Some(mem::replace(pair.value_mut(), value));
                }
                let first_hash = self.comparer.hash(pair.key());
                self.promote(first_hash, key, value);
                None
            }
            Storage::Full(ref mut map) => map.upsert(&self.comparer, key, value),
        }
    }

    // Moves the inline entry and the new one into a fresh backing map. Both
    // hashes are computed before storage is touched, so a panicking comparer
    // leaves the inline entry where it was.
    fn promote(&mut self, first_hash: u64, key: K, value: V) {
        let hash = self.comparer.hash(&key);
        let mut map = BackingMap::with_capacity(PROMOTED_CAPACITY);
        if let Some(first) = self.take_single() {
            let (k, v) = first.into_parts();
            map.insert_unique(first_hash, k, v);
        }
        map.insert_unique(hash, key, value);
        self.storage = Storage::Full(map);
        trace!("adaptive map promoted to full tier");
    }

    pub fn remove(&mut self, key: &K) -> Result<bool, MapError> {
        Ok(self.remove_entry(key)?.is_some())
    }

    pub fn remove_entry(&mut self, key: &K) -> Result<Option<(K, V)>, MapError> {
        self.check_key(key)?;
        let removed = match self.storage {
            Storage::Empty => None,
            Storage::Single(ref pair) if self.comparer.eq(pair.key(), key) => {
                self.take_single().map(Pair::into_parts)
            }
            Storage::Single(_) => None,
            Storage::Full(ref mut map) => map.remove(&self.comparer, key),
        };
        Ok(removed)
    }
}

impl<K, V, C: Default> Default for AdaptiveMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<K, V, C> Clone for AdaptiveMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            comparer: self.comparer.clone(),
        }
    }
}

impl<K, V, C> fmt::Debug for AdaptiveMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Maps are equal when they hold the same number of entries and every key
/// of `self` maps to an equal value in `other`, looked up with `other`'s
/// comparer. Tiers are not compared.
impl<K, V, C> PartialEq for AdaptiveMap<K, V, C>
where
    V: PartialEq,
    C: KeyComparer<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.contains_entry(k, v))
    }
}

impl<K, V, C> Eq for AdaptiveMap<K, V, C>
where
    V: Eq,
    C: KeyComparer<K>,
{
}

impl<K, V, C> Index<&K> for AdaptiveMap<K, V, C>
where
    C: KeyComparer<K>,
{
    type Output = V;

    /// Panics if `key` is absent; use [`AdaptiveMap::get`] for a `Result`.
    fn index(&self, key: &K) -> &V {
        self.try_get(key).expect("key not present in AdaptiveMap")
    }
}

// The default comparer has no null keys, so bulk upserts cannot fail.
impl<K, V, S> Extend<(K, V)> for AdaptiveMap<K, V, DefaultComparer<S>>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.upsert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for AdaptiveMap<K, V, DefaultComparer<S>>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map =
            Self::with_capacity_and_comparer(iter.size_hint().0, DefaultComparer::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for AdaptiveMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        Self::into_iter_of(self.storage)
    }
}

impl<'a, K, V, C> IntoIterator for &'a AdaptiveMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AdaptiveMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
