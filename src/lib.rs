//! adaptive-map: a key-unique map built for the case where most instances
//! hold zero or one entries, without capping how large any one of them may
//! grow.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: per-item property bags and similar maps that are created by the
//!   thousands but rarely hold more than one pair should not pay for a hash
//!   table until they need one.
//! - Layers:
//!   - BackingMap<K, V>: hash table for the full tier. A `hashbrown`
//!     `HashTable` index over a `slotmap` of entries, probed through a
//!     caller-supplied comparer; includes a debug-only probe guard.
//!   - AdaptiveMap<K, V, C>: public API. Stores its contents as one of
//!     `Empty`, `Single(Pair)` or `Full(BackingMap)` and owns the comparer
//!     used by all three.
//!
//! Constraints
//! - Single-threaded: no internal synchronization. Maps are `Send` but
//!   `!Sync`; callers serialize access to a shared map themselves.
//! - Empty and Single never allocate, including their iterators.
//! - One comparer per map, fixed at construction, used by every tier.
//! - Unique keys in every tier. `add` rejects duplicates; `set` overwrites.
//! - Failed operations leave the map unchanged.
//!
//! Tier transitions
//! - Empty -> Single on the first `add`/`set`.
//! - Single -> Full on a second distinct key. The inline pair and the new
//!   pair are moved into a fresh backing map; comparer code runs before the
//!   inline pair is taken, so a panicking comparer cannot drop it.
//! - Single -> Empty when the inline key is removed.
//! - Any -> Empty on `clear`/`drain`.
//! - Full never goes back to Single, whatever its length.
//! - A capacity above one at construction starts the map in Full.
//!
//! Null keys
//! - Rust keys are never null, but a comparer may designate null keys
//!   (`NullableComparer` treats `None` as null). `add`, `set` and `remove`
//!   reject them with `MapError::InvalidArgument`; lookups report them as
//!   absent.
//!
//! Hashing
//! - Each backing entry stores the hash it was inserted with; the index is
//!   rebuilt from stored hashes and never calls `KeyComparer::hash` while
//!   growing.
//!
//! Logging
//! - Tier changes are reported at `trace` level through the `log` facade.
//!   Errors are returned, never logged.
//!
//! Notes and non-goals
//! - No persistence or serialization.
//! - Iteration order is unspecified in the full tier.

mod adaptive_map;
#[cfg(test)]
mod adaptive_map_proptest;
mod backing_map;
mod comparer;
mod error;
mod iter;
mod one;
mod pair;
mod probe_guard;

// Public surface
pub use adaptive_map::{AdaptiveMap, Tier};
pub use comparer::{DefaultComparer, IgnoreAsciiCase, KeyComparer, NullableComparer};
pub use error::MapError;
pub use iter::{IntoIter, IntoKeys, IntoValues, Iter, IterMut, Keys, Values, ValuesMut};
pub use pair::Pair;

#[cfg(feature = "bench_internal")]
pub use backing_map::BackingMap;
