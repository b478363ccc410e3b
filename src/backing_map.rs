//! BackingMap: the full tier's hash table, keyed through a caller-supplied comparer.
//!
//! Entries live in a `SlotMap`; a `hashbrown::HashTable` indexes them by the
//! comparer's hash. Each entry keeps the hash it was inserted with, so
//! growing the index never calls back into the comparer.
//!
//! The map does not own its comparer. `AdaptiveMap` holds the comparer for
//! all tiers and passes it into every keyed operation here.

use crate::comparer::KeyComparer;
use crate::error::MapError;
use crate::probe_guard::ProbeGuard;
use core::iter::FusedIterator;
use hashbrown::hash_table;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};

#[derive(Clone, Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct BackingMap<K, V> {
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    guard: ProbeGuard,
}

impl<K, V> Default for BackingMap<K, V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K, V> BackingMap<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity(capacity),
            guard: ProbeGuard::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn find_slot<C>(&self, comparer: &C, key: &K) -> Option<DefaultKey>
    where
        C: KeyComparer<K>,
    {
        let _g = self.guard.enter();
        let hash = comparer.hash(key);
        self.index
            .find(hash, |&slot| {
                self.slots
                    .get(slot)
                    .map(|e| e.hash == hash && comparer.eq(&e.key, key))
                    .unwrap_or(false)
            })
            .copied()
    }

    pub fn get_key_value<C>(&self, comparer: &C, key: &K) -> Option<(&K, &V)>
    where
        C: KeyComparer<K>,
    {
        let slot = self.find_slot(comparer, key)?;
        self.slots.get(slot).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<C>(&mut self, comparer: &C, key: &K) -> Option<&mut V>
    where
        C: KeyComparer<K>,
    {
        let slot = self.find_slot(comparer, key)?;
        self.slots.get_mut(slot).map(|e| &mut e.value)
    }

    /// Strict insert: fails with `DuplicateKey` and leaves the map untouched
    /// if an equal key is present.
    pub fn insert<C>(&mut self, comparer: &C, key: K, value: V) -> Result<(), MapError>
    where
        C: KeyComparer<K>,
    {
        let _g = self.guard.enter();
        let hash = comparer.hash(&key);
        match self.index.entry(
            hash,
            |&slot| {
                self.slots
                    .get(slot)
                    .map(|e| e.hash == hash && comparer.eq(&e.key, &key))
                    .unwrap_or(false)
            },
            |&slot| self.slots.get(slot).map(|e| e.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(_) => Err(MapError::DuplicateKey),
            hash_table::Entry::Vacant(v) => {
                let slot = self.slots.insert(Entry { key, value, hash });
                v.insert(slot);
                Ok(())
            }
        }
    }

    /// Insert-or-overwrite. Returns the replaced value; the stored key is kept.
    pub fn upsert<C>(&mut self, comparer: &C, key: K, value: V) -> Option<V>
    where
        C: KeyComparer<K>,
    {
        let _g = self.guard.enter();
        let hash = comparer.hash(&key);
        match self.index.entry(
            hash,
            |&slot| {
                self.slots
                    .get(slot)
                    .map(|e| e.hash == hash && comparer.eq(&e.key, &key))
                    .unwrap_or(false)
            },
            |&slot| self.slots.get(slot).map(|e| e.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(o) => {
                let slot = *o.get();
                self.slots
                    .get_mut(slot)
                    .map(|e| core::mem::replace(&mut e.value, value))
            }
            hash_table::Entry::Vacant(v) => {
                let slot = self.slots.insert(Entry { key, value, hash });
                v.insert(slot);
                None
            }
        }
    }

    /// Inserts a key the caller already knows to be absent, under a hash the
    /// caller already computed. Runs no comparer code.
    pub(crate) fn insert_unique(&mut self, hash: u64, key: K, value: V) {
        let _g = self.guard.enter();
        let slot = self.slots.insert(Entry { key, value, hash });
        let slots = &self.slots;
        self.index.insert_unique(hash, slot, |&s| {
            slots.get(s).map(|e| e.hash).unwrap_or(0)
        });
    }

    pub fn remove<C>(&mut self, comparer: &C, key: &K) -> Option<(K, V)>
    where
        C: KeyComparer<K>,
    {
        let _g = self.guard.enter();
        let hash = comparer.hash(key);
        let found = self.index.find_entry(hash, |&slot| {
            self.slots
                .get(slot)
                .map(|e| e.hash == hash && comparer.eq(&e.key, key))
                .unwrap_or(false)
        });
        let (slot, _) = found.ok()?.remove();
        let entry = self.slots.remove(slot)?;
        Some((entry.key, entry.value))
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let _g = self.guard.enter();
        let slots = &mut self.slots;
        self.index.retain(|&mut slot| {
            let keep = match slots.get_mut(slot) {
                Some(e) => f(&e.key, &mut e.value),
                None => false,
            };
            if !keep {
                slots.remove(slot);
            }
            keep
        });
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }
}

impl<K: Clone, V: Clone> Clone for BackingMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            slots: self.slots.clone(),
            guard: ProbeGuard::new(),
        }
    }
}

impl<K, V> IntoIterator for BackingMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            it: self.slots.into_iter(),
        }
    }
}

/// Iterator over `(&K, &V)` in a `BackingMap`. Order is unspecified.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in a `BackingMap`.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)` in a `BackingMap`.
pub struct IntoIter<K, V> {
    it: slotmap::basic::IntoIter<DefaultKey, Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (e.key, e.value))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}
