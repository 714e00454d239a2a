//! Open-addressing frequency tables.
//!
//! Both tables probe linearly from `hash % capacity`, never delete and grow
//! by doubling once an insert would push them past their max load factor.
//! They differ only in where key bytes live: [`ArenaTable`] packs every key
//! into one shared byte arena, [`InlineTable`] gives each bucket its own key.
//! [`StdTable`] wraps `std::collections::HashMap` as a baseline to measure
//! them against.

use alloc::vec::Vec;

use crate::error::{Error, Result};

mod arena;
mod baseline;
mod inline;

pub use arena::ArenaTable;
pub use baseline::StdTable;
pub use inline::InlineTable;

/// Occurrence count of a word
pub type Count = u32;

pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.5;

/// Largest bucket array a table may grow to. Bucket indices come from a
/// 32-bit hash, so anything larger could never be reached by probing.
pub const MAX_CAPACITY: usize = 1 << 31;

/// An insert-or-increment map from words to occurrence counts
pub trait FrequencyTable {
    /// Creates an empty table with the default capacity and load factor
    fn new() -> Self
    where
        Self: Sized;

    /// Creates an empty table of at least `min_capacity` buckets, rounded up
    /// to a power of two
    fn with_capacity(min_capacity: usize, max_load_factor: f32) -> Result<Self>
    where
        Self: Sized;

    /// Counts one more occurrence of `word` and returns its new count.
    /// Counts saturate at `Count::MAX`.
    fn increment(&mut self, word: &[u8]) -> Result<Count>;

    /// Lookup the count of `word`
    fn find(&self, word: &[u8]) -> Option<Count>;

    /// Iterates every counted word once, in bucket order. The table is not
    /// consumed, so draining again yields the same entries.
    fn drain(&self) -> impl Iterator<Item = (Count, &[u8])> + '_;

    /// Returns the number of distinct words
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets
    fn capacity(&self) -> usize;

    fn max_load_factor(&self) -> f32;
}

/// Checks a requested capacity and load factor, returning the power of two
/// capacity the table should start with
pub(crate) fn initial_capacity(min_capacity: usize, max_load_factor: f32) -> Result<usize> {
    if !(max_load_factor > 0.0 && max_load_factor < 1.0) {
        return Err(Error::InvalidLoadFactor(max_load_factor));
    }
    match min_capacity.max(1).checked_next_power_of_two() {
        Some(capacity) if capacity <= MAX_CAPACITY => Ok(capacity),
        _ => Err(Error::CapacityOverflow {
            requested: min_capacity,
        }),
    }
}

/// Whether inserting one more key into a table of `len` keys would break
/// the load factor invariant
#[inline]
pub(crate) fn insert_exceeds_load(len: usize, capacity: usize, max_load_factor: f32) -> bool {
    (len + 1) as f64 > capacity as f64 * max_load_factor as f64
}

/// Capacity after one doubling step
pub(crate) fn doubled_capacity(capacity: usize) -> Result<usize> {
    match capacity.checked_mul(2) {
        Some(requested) if requested <= MAX_CAPACITY => Ok(requested),
        _ => Err(Error::CapacityOverflow {
            requested: capacity.saturating_mul(2),
        }),
    }
}

/// Allocates a bucket array of `capacity` empty buckets, reporting
/// allocation failure instead of aborting
pub(crate) fn try_alloc_buckets<B>(capacity: usize, empty: impl FnMut() -> B) -> Result<Vec<B>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| Error::AllocationFailed { capacity })?;
    buckets.resize_with(capacity, empty);
    Ok(buckets)
}
