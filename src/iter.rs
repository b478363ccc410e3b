//! Iterators and key/value views over an `AdaptiveMap`.
//!
//! The empty and single-entry tiers iterate through `One`; the full tier
//! wraps the backing map's iterators. Borrowing iterators hand out shared
//! references to keys, so a view can never change the map's structure.

use crate::backing_map;
use crate::one::One;
use crate::pair::Pair;
use core::iter::FusedIterator;

enum IterInner<'a, K, V> {
    Inline(One<&'a Pair<K, V>>),
    Full(backing_map::Iter<'a, K, V>),
}

/// Iterator over `(&K, &V)`. Order is unspecified in the full tier.
pub struct Iter<'a, K, V> {
    inner: IterInner<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn inline(pair: Option<&'a Pair<K, V>>) -> Self {
        let one = match pair {
            Some(p) => One::new(p),
            None => One::empty(),
        };
        Self {
            inner: IterInner::Inline(one),
        }
    }

    pub(crate) fn full(it: backing_map::Iter<'a, K, V>) -> Self {
        Self {
            inner: IterInner::Full(it),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Inline(it) => it.next().map(|p| (p.key(), p.value())),
            IterInner::Full(it) => it.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Inline(it) => it.size_hint(),
            IterInner::Full(it) => it.size_hint(),
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

enum IterMutInner<'a, K, V> {
    Inline(One<(&'a K, &'a mut V)>),
    Full(backing_map::IterMut<'a, K, V>),
}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V> {
    inner: IterMutInner<'a, K, V>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn inline(pair: Option<&'a mut Pair<K, V>>) -> Self {
        let one = match pair {
            Some(p) => One::new(p.parts_mut()),
            None => One::empty(),
        };
        Self {
            inner: IterMutInner::Inline(one),
        }
    }

    pub(crate) fn full(it: backing_map::IterMut<'a, K, V>) -> Self {
        Self {
            inner: IterMutInner::Full(it),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterMutInner::Inline(it) => it.next(),
            IterMutInner::Full(it) => it.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterMutInner::Inline(it) => it.size_hint(),
            IterMutInner::Full(it) => it.size_hint(),
        }
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

enum IntoIterInner<K, V> {
    Inline(One<Pair<K, V>>),
    Full(backing_map::IntoIter<K, V>),
}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V> {
    inner: IntoIterInner<K, V>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn inline(pair: Option<Pair<K, V>>) -> Self {
        let one = match pair {
            Some(p) => One::new(p),
            None => One::empty(),
        };
        Self {
            inner: IntoIterInner::Inline(one),
        }
    }

    pub(crate) fn full(it: backing_map::IntoIter<K, V>) -> Self {
        Self {
            inner: IntoIterInner::Full(it),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IntoIterInner::Inline(it) => it.next().map(Pair::into_parts),
            IntoIterInner::Full(it) => it.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IntoIterInner::Inline(it) => it.size_hint(),
            IntoIterInner::Full(it) => it.size_hint(),
        }
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

// Projections over the three base iterators.
macro_rules! projection {
    ($(#[$doc:meta])* $name:ident<$($lt:lifetime,)? K, V>, $base:ty, $item:ty, |$x:pat_param| $proj:expr) => {
        $(#[$doc])*
        pub struct $name<$($lt,)? K, V> {
            pub(crate) inner: $base,
        }

        impl<$($lt,)? K, V> Iterator for $name<$($lt,)? K, V> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next().map(|$x| $proj)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<$($lt,)? K, V> ExactSizeIterator for $name<$($lt,)? K, V> {}
        impl<$($lt,)? K, V> FusedIterator for $name<$($lt,)? K, V> {}
    };
}

projection!(
    /// Read-only view of the keys.
    Keys<'a, K, V>, Iter<'a, K, V>, &'a K, |(k, _)| k
);
projection!(
    /// Read-only view of the values.
    Values<'a, K, V>, Iter<'a, K, V>, &'a V, |(_, v)| v
);
projection!(
    /// Mutable view of the values. Keys stay untouched.
    ValuesMut<'a, K, V>, IterMut<'a, K, V>, &'a mut V, |(_, v)| v
);
projection!(
    /// Owning iterator over the keys.
    IntoKeys<K, V>, IntoIter<K, V>, K, |(k, _)| k
);
projection!(
    /// Owning iterator over the values.
    IntoValues<K, V>, IntoIter<K, V>, V, |(_, v)| v
);
