use alloc::boxed::Box;
use core::hash::{BuildHasherDefault, Hasher};
use std::collections::HashMap;

use super::{initial_capacity, Count, FrequencyTable, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
use crate::error::{Error, Result};
use crate::hasher::{Fnv1, WordHasher};

/// Feeds a whole word to a [`WordHasher`] through std's `Hasher` interface
#[derive(Default)]
struct StdWordHasher<H: WordHasher> {
    hasher: H,
    hash: u32,
}

impl<H: WordHasher> Hasher for StdWordHasher<H> {
    fn write(&mut self, bytes: &[u8]) {
        self.hash = self.hasher.hash_word(bytes);
    }

    // Slices hash their length before their bytes, the word hash covers both
    fn write_usize(&mut self, _len: usize) {}

    fn finish(&self) -> u64 {
        // hashbrown takes its control byte from the top bits
        let hash = self.hash as u64;
        hash << 32 | hash
    }
}

/// Baseline frequency table on top of `std::collections::HashMap`.
///
/// Hashes words with the same [`WordHasher`] as the open-addressing tables,
/// so benchmarks compare layouts rather than hash functions. The map keeps
/// its own growth policy: the max load factor is validated and reported but
/// does not drive resizing.
#[derive(Debug)]
pub struct StdTable<H: WordHasher = Fnv1> {
    map: HashMap<Box<[u8]>, Count, BuildHasherDefault<StdWordHasher<H>>>,
    max_load_factor: f32,
}

impl<H: WordHasher> FrequencyTable for StdTable<H> {
    fn new() -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(DEFAULT_CAPACITY, Default::default()),
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    fn with_capacity(min_capacity: usize, max_load_factor: f32) -> Result<Self> {
        let capacity = initial_capacity(min_capacity, max_load_factor)?;
        let mut map = HashMap::with_hasher(Default::default());
        map.try_reserve(capacity)
            .map_err(|_| Error::AllocationFailed { capacity })?;
        Ok(Self {
            map,
            max_load_factor,
        })
    }

    fn increment(&mut self, word: &[u8]) -> Result<Count> {
        if let Some(count) = self.map.get_mut(word) {
            *count = count.saturating_add(1);
            return Ok(*count);
        }
        self.map
            .try_reserve(1)
            .map_err(|_| Error::AllocationFailed {
                capacity: self.map.len() + 1,
            })?;
        self.map.insert(word.into(), 1);
        Ok(1)
    }

    fn find(&self, word: &[u8]) -> Option<Count> {
        self.map.get(word).copied()
    }

    fn drain(&self) -> impl Iterator<Item = (Count, &[u8])> + '_ {
        self.map
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(word, count)| (*count, &**word))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.map.capacity()
    }

    fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::FxWord;

    #[test]
    fn test_base_increment() {
        let mut table: StdTable = StdTable::new();
        assert_eq!(table.find(b"cat"), None);
        assert_eq!(table.increment(b"cat").unwrap(), 1);
        assert_eq!(table.increment(b"cat").unwrap(), 2);
        assert_eq!(table.increment(b"").unwrap(), 1);
        assert_eq!(table.find(b"cat"), Some(2));
        assert_eq!(table.find(b""), Some(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_word_hasher_drives_the_map() {
        let mut state = StdWordHasher::<Fnv1>::default();
        core::hash::Hash::hash(&b"the"[..], &mut state);
        let hash = Fnv1.hash_word(b"the") as u64;
        assert_eq!(state.finish(), hash << 32 | hash);
    }

    #[test]
    fn test_rejects_bad_load_factor() {
        assert!(matches!(
            StdTable::<FxWord>::with_capacity(16, 1.0),
            Err(Error::InvalidLoadFactor(_))
        ));
        let table = StdTable::<FxWord>::with_capacity(100, 0.7).unwrap();
        assert!(table.capacity() >= 128);
        assert_eq!(table.max_load_factor(), 0.7);
    }

    #[test]
    fn test_count_saturates() {
        let mut table: StdTable = StdTable::new();
        table.increment(b"max").unwrap();
        if let Some(count) = table.map.get_mut(&b"max"[..]) {
            *count = Count::MAX - 1;
        }
        assert_eq!(table.increment(b"max").unwrap(), Count::MAX);
        assert_eq!(table.increment(b"max").unwrap(), Count::MAX);
    }

    #[test]
    fn test_many_words_and_restartable_drain() {
        let mut table: StdTable<FxWord> = StdTable::new();
        for i in 0..1000u32 {
            table.increment(i.to_string().as_bytes()).unwrap();
            table.increment(b"common").unwrap();
        }
        assert_eq!(table.len(), 1001);
        assert_eq!(table.find(b"common"), Some(1000));
        let total: u64 = table.drain().map(|(count, _)| count as u64).sum();
        assert_eq!(total, 2000);
        assert_eq!(table.drain().count(), table.drain().count());
    }
}
