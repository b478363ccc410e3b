//! Failures reported by `AdaptiveMap` operations.
//!
//! Every error is a contract violation at the call site. A failing call
//! leaves the map exactly as it was.

use core::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MapError {
    /// The key is null according to the map's comparer.
    InvalidArgument,
    /// `add` was called with a key that is already present.
    DuplicateKey,
    /// `get` was called with a key that is not present.
    KeyNotFound,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MapError::InvalidArgument => "key must not be null",
            MapError::DuplicateKey => "an entry with the same key already exists",
            MapError::KeyNotFound => "the given key was not present in the map",
        })
    }
}

impl std::error::Error for MapError {}
