use alloc::vec::Vec;
use core::mem;

use log::debug;

use super::{
    doubled_capacity, initial_capacity, insert_exceeds_load, try_alloc_buckets, Count,
    FrequencyTable, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR,
};
use crate::error::{Error, Result};
use crate::hasher::{Fnv1, WordHasher};

#[derive(Debug, Default, Clone, Copy)]
enum Slot {
    #[default]
    Empty,
    /// Keeps the full hash so that growth never rehashes key bytes and most
    /// mismatching probes are rejected without touching the arena
    Occupied {
        hash: u32,
        count: Count,
        start: usize,
        len: usize,
    },
}

/// Frequency table storing all keys back to back in one byte arena.
///
/// Buckets are small `Copy` records pointing into the arena, so inserting a
/// word never allocates per key and rehashing only moves the records.
#[derive(Debug)]
pub struct ArenaTable<H: WordHasher = Fnv1> {
    slots: Vec<Slot>,
    keys: Vec<u8>,
    capacity: usize,
    size: usize,
    max_load_factor: f32,
    hasher: H,
}

impl<H: WordHasher> ArenaTable<H> {
    #[inline]
    fn key(&self, start: usize, len: usize) -> &[u8] {
        &self.keys[start..start + len]
    }

    fn vacant_slot(slots: &[Slot], hash: u32) -> usize {
        let mask = slots.len() - 1;
        let mut slot_i = hash as usize & mask;
        while let Slot::Occupied { .. } = slots[slot_i] {
            slot_i = (slot_i + 1) & mask;
        }
        slot_i
    }

    fn grow_for_insert(&mut self) -> Result<()> {
        while insert_exceeds_load(self.size, self.capacity, self.max_load_factor) {
            self.rehash(doubled_capacity(self.capacity)?)?;
        }
        Ok(())
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        let mut slots = try_alloc_buckets(new_capacity, || Slot::Empty)?;
        for slot in mem::take(&mut self.slots) {
            if let Slot::Occupied { hash, .. } = slot {
                let slot_i = Self::vacant_slot(&slots, hash);
                slots[slot_i] = slot;
            }
        }
        debug!(
            "arena table grew from {} to {} buckets holding {} words ({} key bytes)",
            self.capacity,
            new_capacity,
            self.size,
            self.keys.len()
        );
        self.slots = slots;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Copies a new key into the arena, returning where it starts
    fn push_key(&mut self, word: &[u8]) -> Result<usize> {
        let start = self.keys.len();
        self.keys
            .try_reserve(word.len())
            .map_err(|_| Error::AllocationFailed {
                capacity: start + word.len(),
            })?;
        self.keys.extend_from_slice(word);
        Ok(start)
    }

    /// Returns the number of key bytes held by the arena
    pub fn arena_len(&self) -> usize {
        self.keys.len()
    }
}

impl<H: WordHasher> FrequencyTable for ArenaTable<H> {
    fn new() -> Self {
        Self {
            slots: vec![Slot::Empty; DEFAULT_CAPACITY],
            keys: Vec::new(),
            capacity: DEFAULT_CAPACITY,
            size: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hasher: H::default(),
        }
    }

    fn with_capacity(min_capacity: usize, max_load_factor: f32) -> Result<Self> {
        let capacity = initial_capacity(min_capacity, max_load_factor)?;
        Ok(Self {
            slots: try_alloc_buckets(capacity, || Slot::Empty)?,
            keys: Vec::new(),
            capacity,
            size: 0,
            max_load_factor,
            hasher: H::default(),
        })
    }

    fn increment(&mut self, word: &[u8]) -> Result<Count> {
        let hash = self.hasher.hash_word(word);
        let mask = self.capacity - 1;
        let mut slot_i = hash as usize & mask;
        let mut vacant = None;
        for _ in 0..self.capacity {
            let slot = self.slots[slot_i];
            match slot {
                Slot::Occupied {
                    hash: h,
                    count,
                    start,
                    len,
                } if h == hash && self.key(start, len) == word => {
                    let count = count.saturating_add(1);
                    self.slots[slot_i] = Slot::Occupied {
                        hash,
                        count,
                        start,
                        len,
                    };
                    return Ok(count);
                }
                Slot::Empty => {
                    vacant = Some(slot_i);
                    break;
                }
                Slot::Occupied { .. } => slot_i = (slot_i + 1) & mask,
            }
        }

        let slot_i = match vacant {
            Some(slot_i)
                if !insert_exceeds_load(self.size, self.capacity, self.max_load_factor) =>
            {
                slot_i
            }
            _ => {
                self.grow_for_insert()?;
                Self::vacant_slot(&self.slots, hash)
            }
        };
        let start = self.push_key(word)?;
        self.slots[slot_i] = Slot::Occupied {
            hash,
            count: 1,
            start,
            len: word.len(),
        };
        self.size += 1;
        Ok(1)
    }

    fn find(&self, word: &[u8]) -> Option<Count> {
        let hash = self.hasher.hash_word(word);
        let mask = self.capacity - 1;
        let start_i = hash as usize & mask;
        let mut slot_i = start_i;
        loop {
            match self.slots[slot_i] {
                Slot::Occupied {
                    hash: h,
                    count,
                    start,
                    len,
                } if h == hash && self.key(start, len) == word => return Some(count),
                Slot::Empty => return None,
                Slot::Occupied { .. } => {
                    slot_i = (slot_i + 1) & mask;
                    if slot_i == start_i {
                        return None;
                    }
                }
            }
        }
    }

    fn drain(&self) -> impl Iterator<Item = (Count, &[u8])> + '_ {
        self.slots.iter().filter_map(move |slot| match *slot {
            Slot::Occupied {
                count, start, len, ..
            } if count > 0 => Some((count, self.key(start, len))),
            _ => None,
        })
    }

    fn len(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sends every word to bucket 0 so probing is exercised on each insert
    #[derive(Debug, Default)]
    struct Constant;

    impl WordHasher for Constant {
        fn hash_word(&self, _word: &[u8]) -> u32 {
            0
        }
    }

    #[test]
    fn test_base_increment() {
        let mut table: ArenaTable = ArenaTable::new();
        assert_eq!(table.find(b"cat"), None);
        assert_eq!(table.increment(b"cat").unwrap(), 1);
        assert_eq!(table.increment(b"cat").unwrap(), 2);
        assert_eq!(table.increment(b"sat").unwrap(), 1);
        assert_eq!(table.find(b"cat"), Some(2));
        assert_eq!(table.find(b"sat"), Some(1));
        assert_eq!(table.len(), 2);
        // Keys are stored once, repeated increments do not grow the arena
        assert_eq!(table.arena_len(), 6);
    }

    #[test]
    fn test_collisions_probe_linearly() {
        let mut table: ArenaTable<Constant> = ArenaTable::with_capacity(8, 0.9).unwrap();
        for word in [&b"a"[..], b"b", b"c", b"d"] {
            table.increment(word).unwrap();
        }
        table.increment(b"c").unwrap();
        assert_eq!(table.find(b"a"), Some(1));
        assert_eq!(table.find(b"c"), Some(2));
        assert_eq!(table.find(b"z"), None);
        let order: Vec<&[u8]> = table.drain().map(|(_, w)| w).collect();
        assert_eq!(order, vec![&b"a"[..], b"b", b"c", b"d"]);
    }

    #[test]
    fn test_rehash_keeps_counts() {
        let mut table: ArenaTable<Constant> = ArenaTable::with_capacity(2, 0.5).unwrap();
        for i in 0..40u8 {
            for _ in 0..=i % 3 {
                table.increment(&[b'a' + i % 26, b'a' + i / 26]).unwrap();
            }
        }
        assert_eq!(table.len(), 40);
        assert!(table.capacity() >= 80);
        for i in 0..40u8 {
            let word = [b'a' + i % 26, b'a' + i / 26];
            assert_eq!(table.find(&word), Some((i % 3) as Count + 1));
        }
    }

    #[test]
    fn test_find_on_full_cycle_is_absent() {
        let mut table: ArenaTable<Constant> = ArenaTable::with_capacity(4, 0.5).unwrap();
        table.increment(b"x").unwrap();
        table.increment(b"y").unwrap();
        // Fill every slot behind the table's back to force a wrap-around
        for slot in table.slots.iter_mut() {
            if let Slot::Empty = slot {
                *slot = Slot::Occupied {
                    hash: 7,
                    count: 1,
                    start: 0,
                    len: 1,
                };
            }
        }
        assert_eq!(table.find(b"missing"), None);
        assert_eq!(table.find(b"y"), Some(1));
    }

    #[test]
    fn test_count_saturates() {
        let mut table: ArenaTable = ArenaTable::new();
        table.increment(b"max").unwrap();
        for slot in table.slots.iter_mut() {
            if let Slot::Occupied { count, .. } = slot {
                *count = Count::MAX - 1;
            }
        }
        assert_eq!(table.increment(b"max").unwrap(), Count::MAX);
        assert_eq!(table.increment(b"max").unwrap(), Count::MAX);
        assert_eq!(table.find(b"max"), Some(Count::MAX));
    }

    #[test]
    fn test_empty_word_is_a_key() {
        let mut table: ArenaTable = ArenaTable::new();
        table.increment(b"").unwrap();
        assert_eq!(table.find(b""), Some(1));
        assert_eq!(table.find(b"a"), None);
    }
}
