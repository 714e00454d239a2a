//! # wordfreq - streaming word-frequency counting
//!
//! Counts ASCII words in a byte stream delivered in arbitrary chunks. Two
//! pieces do the work:
//!
//! - a [`Tokenizer`] that lowercases letters in place and rebuilds words cut
//!   in half by a chunk boundary, and
//! - an open-addressing [`FrequencyTable`] tuned for insert-or-increment with
//!   no deletions, growing by doubling past its max load factor.
//!
//! [`WordCounter`] wires them together behind `feed_chunk` / `finish` /
//! `report`.
//!
//! ## Example
//!
//! ```
//! use std::io::Cursor;
//! use wordfreq::{feed_reader, sort_by_frequency, WordCounter};
//!
//! let mut counter = WordCounter::new();
//! feed_reader(&mut counter, Cursor::new("the cat and the hat"), 4)?;
//! counter.finish()?;
//!
//! let mut entries = counter.report()?;
//! sort_by_frequency(&mut entries);
//! assert_eq!((entries[0].count, entries[0].word.as_str()), (2, "the"));
//! # Ok::<(), wordfreq::Error>(())
//! ```

extern crate alloc;

pub mod config;
mod counter;
mod error;
pub mod hasher;
pub mod report;
mod stream;
pub mod table;
mod tokenizer;


pub use config::{CounterConfig, HashKind, TableKind};
pub use counter::WordCounter;
pub use error::{Error, Result};
pub use hasher::{Djb2Mix, Fnv1, Fnv1a, FxWord, WordHasher};
pub use report::{sort_by_frequency, FrequencyEntry, Report, Summary};
pub use stream::feed_reader;
pub use table::{ArenaTable, Count, FrequencyTable, InlineTable, StdTable};
pub use tokenizer::{Tokenizer, WordSink};
