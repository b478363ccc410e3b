//! `One<T>`: an iterator over at most one item.
//!
//! The empty and single-entry tiers iterate through this instead of building
//! a one-element collection, so those paths never allocate.

use core::iter::FusedIterator;

#[derive(Clone, Debug)]
pub(crate) struct One<T> {
    item: Option<T>,
}

impl<T> One<T> {
    #[inline]
    pub(crate) const fn new(item: T) -> Self {
        Self { item: Some(item) }
    }

    #[inline]
    pub(crate) const fn empty() -> Self {
        Self { item: None }
    }
}

impl<T> Iterator for One<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.item.take()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.item.is_some());
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for One<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.item.take()
    }
}

impl<T> ExactSizeIterator for One<T> {}
impl<T> FusedIterator for One<T> {}
