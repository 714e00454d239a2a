//! Chunked ASCII word tokenizer.
//!
//! The tokenizer scans caller-owned byte chunks, lowercasing letters in place,
//! and hands every complete word to a [`WordSink`]. A word still open when a
//! chunk ends is copied into the straddle buffer and completed by the leading
//! letters of the following chunk, or by [`Tokenizer::finish`].

use alloc::vec::Vec;
use core::convert::Infallible;

use log::trace;

use crate::error::Error;
use crate::hasher::WordHasher;
use crate::table::{ArenaTable, FrequencyTable, InlineTable, StdTable};

/// Default initial size of the straddle buffer in bytes
pub const DEFAULT_STRADDLE_CAPACITY: usize = 32;

/// Receives the words emitted by a [`Tokenizer`]
pub trait WordSink {
    type Error;

    fn accept(&mut self, word: &[u8]) -> Result<(), Self::Error>;
}

impl<H: WordHasher> WordSink for ArenaTable<H> {
    type Error = Error;

    #[inline]
    fn accept(&mut self, word: &[u8]) -> Result<(), Error> {
        self.increment(word).map(|_| ())
    }
}

impl<H: WordHasher> WordSink for InlineTable<H> {
    type Error = Error;

    #[inline]
    fn accept(&mut self, word: &[u8]) -> Result<(), Error> {
        self.increment(word).map(|_| ())
    }
}

impl<H: WordHasher> WordSink for StdTable<H> {
    type Error = Error;

    #[inline]
    fn accept(&mut self, word: &[u8]) -> Result<(), Error> {
        self.increment(word).map(|_| ())
    }
}

/// Collects every emitted word, in order
impl WordSink for Vec<Vec<u8>> {
    type Error = Infallible;

    fn accept(&mut self, word: &[u8]) -> Result<(), Infallible> {
        self.push(word.to_vec());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    InWord,
}

#[derive(Debug)]
pub struct Tokenizer {
    state: ScanState,
    // Tail of a word cut by the end of the previous chunk. Grows as needed.
    straddle: Vec<u8>,
    words_emitted: u64,
    bytes_scanned: u64,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_straddle_capacity(DEFAULT_STRADDLE_CAPACITY)
    }

    pub fn with_straddle_capacity(capacity: usize) -> Self {
        Self {
            state: ScanState::Idle,
            straddle: Vec::with_capacity(capacity),
            words_emitted: 0,
            bytes_scanned: 0,
        }
    }

    /// Scans one chunk, lowercasing its letters in place and sending every
    /// word it completes to `sink`.
    ///
    /// On a sink error the scan stops and the error is returned; words
    /// emitted before it stay counted.
    pub fn feed_chunk<S: WordSink>(
        &mut self,
        chunk: &mut [u8],
        sink: &mut S,
    ) -> Result<(), S::Error> {
        self.bytes_scanned += chunk.len() as u64;
        let mut idx = 0;

        if self.state == ScanState::InWord {
            // Continue the word carried over from the previous chunk
            let end = chunk
                .iter()
                .position(|b| !b.is_ascii_alphabetic())
                .unwrap_or(chunk.len());
            chunk[..end].make_ascii_lowercase();
            self.straddle.extend_from_slice(&chunk[..end]);
            if end == chunk.len() {
                return Ok(());
            }
            self.state = ScanState::Idle;
            let emitted = sink.accept(&self.straddle);
            self.straddle.clear();
            emitted?;
            self.words_emitted += 1;
            // chunk[end] is the separator that closed the word
            idx = end + 1;
        }

        let mut word_start = 0;
        while idx < chunk.len() {
            let b = chunk[idx];
            if b.is_ascii_alphabetic() {
                chunk[idx] = b.to_ascii_lowercase();
                if self.state == ScanState::Idle {
                    word_start = idx;
                    self.state = ScanState::InWord;
                }
            } else if self.state == ScanState::InWord {
                self.state = ScanState::Idle;
                sink.accept(&chunk[word_start..idx])?;
                self.words_emitted += 1;
            }
            idx += 1;
        }

        if self.state == ScanState::InWord {
            self.straddle.extend_from_slice(&chunk[word_start..]);
        }
        Ok(())
    }

    /// Signals the end of the stream, emitting the word left open by the last
    /// chunk if there is one
    pub fn finish<S: WordSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        if self.state == ScanState::Idle {
            return Ok(());
        }
        trace!("flushing {} straddled bytes at end of stream", self.straddle.len());
        self.state = ScanState::Idle;
        let emitted = sink.accept(&self.straddle);
        self.straddle.clear();
        emitted?;
        self.words_emitted += 1;
        Ok(())
    }

    /// Whether a word is open across the last chunk boundary
    pub fn in_word(&self) -> bool {
        self.state == ScanState::InWord
    }

    pub fn words_emitted(&self) -> u64 {
        self.words_emitted
    }

    pub fn bytes_scanned(&self) -> u64 {
        self.bytes_scanned
    }
}
