use alloc::boxed::Box;
use alloc::vec::Vec;
use core::mem;

use log::debug;

use super::{
    doubled_capacity, initial_capacity, insert_exceeds_load, try_alloc_buckets, Count,
    FrequencyTable, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR,
};
use crate::error::Result;
use crate::hasher::{Fnv1, WordHasher};

#[derive(Debug, Default)]
enum Bucket {
    #[default]
    Empty,
    /// Occupied contains the owned key and its count
    Occupied(Box<[u8]>, Count),
}

/// Frequency table whose buckets own their key bytes.
///
/// Rehashing recomputes every key's hash, so this layout trades growth speed
/// for smaller buckets than [`super::ArenaTable`].
#[derive(Debug)]
pub struct InlineTable<H: WordHasher = Fnv1> {
    buckets: Vec<Bucket>,
    // the table capacity (cache of buckets.len(), always a power of two)
    capacity: usize,
    // Number of occupied buckets
    size: usize,
    max_load_factor: f32,
    hasher: H,
}

impl<H: WordHasher> InlineTable<H> {
    // Linear probing for the first empty bucket. Only called when the load
    // factor guarantees one exists.
    fn vacant_slot(buckets: &[Bucket], hash: u32) -> usize {
        let mask = buckets.len() - 1;
        let mut bucket_i = hash as usize & mask;
        while let Bucket::Occupied(..) = buckets[bucket_i] {
            bucket_i = (bucket_i + 1) & mask;
        }
        bucket_i
    }

    /// Doubles the table until one more key fits under the load factor
    fn grow_for_insert(&mut self) -> Result<()> {
        while insert_exceeds_load(self.size, self.capacity, self.max_load_factor) {
            self.rehash(doubled_capacity(self.capacity)?)?;
        }
        Ok(())
    }

    fn rehash(&mut self, new_capacity: usize) -> Result<()> {
        let mut buckets = try_alloc_buckets(new_capacity, || Bucket::Empty)?;
        for bucket in mem::take(&mut self.buckets) {
            if let Bucket::Occupied(key, count) = bucket {
                let bucket_i = Self::vacant_slot(&buckets, self.hasher.hash_word(&key));
                buckets[bucket_i] = Bucket::Occupied(key, count);
            }
        }
        debug!(
            "inline table grew from {} to {} buckets holding {} words",
            self.capacity, new_capacity, self.size
        );
        self.buckets = buckets;
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<H: WordHasher> FrequencyTable for InlineTable<H> {
    fn new() -> Self {
        let mut buckets = Vec::with_capacity(DEFAULT_CAPACITY);
        buckets.resize_with(DEFAULT_CAPACITY, || Bucket::Empty);
        Self {
            buckets,
            capacity: DEFAULT_CAPACITY,
            size: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hasher: H::default(),
        }
    }

    fn with_capacity(min_capacity: usize, max_load_factor: f32) -> Result<Self> {
        let capacity = initial_capacity(min_capacity, max_load_factor)?;
        Ok(Self {
            buckets: try_alloc_buckets(capacity, || Bucket::Empty)?,
            capacity,
            size: 0,
            max_load_factor,
            hasher: H::default(),
        })
    }

    fn increment(&mut self, word: &[u8]) -> Result<Count> {
        let hash = self.hasher.hash_word(word);
        let mask = self.capacity - 1;
        let mut bucket_i = hash as usize & mask;
        let mut vacant = None;
        for _ in 0..self.capacity {
            match &mut self.buckets[bucket_i] {
                Bucket::Occupied(key, count) if **key == *word => {
                    *count = count.saturating_add(1);
                    return Ok(*count);
                }
                Bucket::Empty => {
                    vacant = Some(bucket_i);
                    break;
                }
                Bucket::Occupied(..) => bucket_i = (bucket_i + 1) & mask,
            }
        }

        // A new key. Grow first if it would overfill the table, which moves
        // every bucket, so the free slot has to be found again.
        let bucket_i = match vacant {
            Some(bucket_i)
                if !insert_exceeds_load(self.size, self.capacity, self.max_load_factor) =>
            {
                bucket_i
            }
            _ => {
                self.grow_for_insert()?;
                Self::vacant_slot(&self.buckets, hash)
            }
        };
        self.buckets[bucket_i] = Bucket::Occupied(word.into(), 1);
        self.size += 1;
        Ok(1)
    }

    // Lookup using linear probing
    fn find(&self, word: &[u8]) -> Option<Count> {
        let mask = self.capacity - 1;
        let start = self.hasher.hash_word(word) as usize & mask;
        let mut bucket_i = start;
        loop {
            match &self.buckets[bucket_i] {
                Bucket::Occupied(key, count) if **key == *word => return Some(*count),
                Bucket::Empty => return None,
                Bucket::Occupied(..) => {
                    bucket_i = (bucket_i + 1) & mask;
                    if bucket_i == start {
                        return None;
                    }
                }
            }
        }
    }

    fn drain(&self) -> impl Iterator<Item = (Count, &[u8])> + '_ {
        self.buckets.iter().filter_map(|bucket| match bucket {
            Bucket::Occupied(key, count) if *count > 0 => Some((*count, &**key)),
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
