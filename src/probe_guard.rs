//! Debug-only detector for comparer callbacks that re-enter a backing map.
//!
//! A `KeyComparer` runs while the backing map walks its index. If that
//! callback reaches back into the same map, the index may be observed
//! half-updated. Debug builds track an active probe per map and panic on a
//! nested one; release builds compile the guard to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map probe tracker. Each public entry point of the backing map starts
/// with `let _g = self.guard.enter();`.
#[derive(Debug)]
pub(crate) struct ProbeGuard {
    #[cfg(debug_assertions)]
    active: Cell<bool>,
    // !Sync in every build profile, not only when `active` exists.
    _unsync: PhantomData<Cell<()>>,
}

impl ProbeGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(false),
            _unsync: PhantomData,
        }
    }

    /// Marks a probe as active until the returned scope is dropped.
    #[inline]
    pub(crate) fn enter(&self) -> ProbeScope<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.active.replace(true),
                "comparer re-entered the map it is probing"
            );
            return ProbeScope { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ProbeScope { _z: PhantomData };
        }
    }
}

impl Default for ProbeGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII scope returned by `ProbeGuard::enter`.
pub(crate) struct ProbeScope<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ProbeScope<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let was_active = self.owner.active.replace(false);
            debug_assert!(was_active);
        }
    }
}
