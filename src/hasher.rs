//! Word hash functions used to place keys in the frequency tables.
//!
//! Every hasher is a pure function of the word bytes. Tables reduce the
//! 32-bit result to a bucket index with `hash % capacity`.

/// 32-bit FNV prime
pub const FNV32_PRIME: u32 = 0x0100_0193;

/// Seed shared by the rolling hashes. Odd and non-zero so that the empty
/// word and short words do not collapse onto zero.
pub const HASH_SEED: u32 = 1;

/// Hashes a word to a fixed-width unsigned integer
pub trait WordHasher: Default {
    fn hash_word(&self, word: &[u8]) -> u32;
}

/// Multiply-then-xor rolling hash. This is the default hasher.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fnv1;

impl WordHasher for Fnv1 {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u32 {
        word.iter()
            .fold(HASH_SEED, |acc, &b| acc.wrapping_mul(FNV32_PRIME) ^ b as u32)
    }
}

/// Xor-then-multiply variant of [`Fnv1`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Fnv1a;

impl WordHasher for Fnv1a {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u32 {
        word.iter()
            .fold(HASH_SEED, |acc, &b| (acc ^ b as u32).wrapping_mul(FNV32_PRIME))
    }
}

/// djb2 (`h * 33 ^ b`) followed by the murmur3 finalizer, which spreads
/// the weak low bits of djb2 over the whole word.
#[derive(Debug, Default, Clone, Copy)]
pub struct Djb2Mix;

impl WordHasher for Djb2Mix {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u32 {
        let mut h = word.iter().fold(HASH_SEED, |acc, &b| {
            (acc << 5).wrapping_add(acc) ^ b as u32
        });
        h ^= h >> 16;
        h = h.wrapping_mul(0x85eb_ca6b);
        h ^= h >> 13;
        h = h.wrapping_mul(0xc2b2_ae35);
        h ^= h >> 16;
        h
    }
}

/// Firefox hash via the `fxhash` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct FxWord;

impl WordHasher for FxWord {
    #[inline]
    fn hash_word(&self, word: &[u8]) -> u32 {
        fxhash::hash32(word)
    }
}
