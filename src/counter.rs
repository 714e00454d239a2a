//! The counting session: a tokenizer feeding one frequency table.

use crate::config::CounterConfig;
use crate::error::{Error, Result};
use crate::report::{self, FrequencyEntry, Report, Summary};
use crate::table::{ArenaTable, FrequencyTable};
use crate::tokenizer::{Tokenizer, WordSink};

/// Counts the words of one byte stream.
///
/// Feed the stream with [`feed_chunk`](Self::feed_chunk), close it with
/// [`finish`](Self::finish), then read the counts with
/// [`report`](Self::report). Aborting before `finish` leaves the table
/// valid with the counts accumulated so far.
///
/// ```
/// use wordfreq::WordCounter;
///
/// let mut counter = WordCounter::new();
/// counter.feed_chunk(&mut b"The Cat sat".to_vec())?;
/// counter.feed_chunk(&mut b". THE CAT SAT!".to_vec())?;
/// counter.finish()?;
///
/// let report = counter.report()?;
/// assert_eq!(report.len(), 3);
/// assert!(report.iter().all(|entry| entry.count == 2));
/// # Ok::<(), wordfreq::Error>(())
/// ```
#[derive(Debug)]
pub struct WordCounter<T = ArenaTable> {
    tokenizer: Tokenizer,
    table: T,
    finished: bool,
}

impl WordCounter<ArenaTable> {
    /// Creates a counter over the default table
    pub fn new() -> Self {
        Self::with_table(ArenaTable::new(), Tokenizer::new())
    }
}

impl Default for WordCounter<ArenaTable> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WordCounter<T>
where
    T: FrequencyTable + WordSink<Error = Error>,
{
    pub fn with_table(table: T, tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            table,
            finished: false,
        }
    }

    /// Builds the table and tokenizer described by `config`. The table type
    /// is chosen by the caller; `config.table` and `config.hasher` are
    /// ignored here.
    pub fn with_config(config: &CounterConfig) -> Result<Self> {
        config.validate()?;
        let table = T::with_capacity(config.initial_capacity, config.max_load_factor)?;
        Ok(Self::with_table(
            table,
            Tokenizer::with_straddle_capacity(config.straddle_capacity),
        ))
    }

    /// Pushes one chunk of the stream. Letters in `chunk` are lowercased in
    /// place.
    pub fn feed_chunk(&mut self, chunk: &mut [u8]) -> Result<()> {
        if self.finished {
            return Err(Error::StreamFinished);
        }
        self.tokenizer.feed_chunk(chunk, &mut self.table)
    }

    /// Ends the stream, counting a word left open by the last chunk.
    /// Finishing twice is a no-op.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.tokenizer.finish(&mut self.table)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns every `(count, word)` pair, in table order
    pub fn report(&self) -> Result<Vec<FrequencyEntry>> {
        if !self.finished {
            return Err(Error::NotFinished);
        }
        Ok(report::collect(&self.table))
    }

    /// Report with its summary, suitable for serialization
    pub fn full_report(&self) -> Result<Report> {
        Ok(Report {
            entries: self.report()?,
            summary: self.summary(),
        })
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total_words: self.tokenizer.words_emitted(),
            unique_words: self.table.len(),
        }
    }

    /// Words counted so far, duplicates included
    pub fn words_counted(&self) -> u64 {
        self.tokenizer.words_emitted()
    }

    pub fn bytes_scanned(&self) -> u64 {
        self.tokenizer.bytes_scanned()
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn into_table(self) -> T {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Fnv1a;
    use crate::table::InlineTable;

    fn counts<T: FrequencyTable>(table: &T) -> Vec<(String, u32)> {
        let mut counts: Vec<(String, u32)> = table
            .drain()
            .map(|(count, word)| (String::from_utf8(word.to_vec()).unwrap(), count))
            .collect();
        counts.sort();
        counts
    }

    #[test]
    fn test_scenario_split_anywhere() {
        let input = b"The Cat sat. THE CAT SAT!";
        for split in 0..=input.len() {
            let mut counter = WordCounter::new();
            let (first, second) = input.split_at(split);
            counter.feed_chunk(&mut first.to_vec()).unwrap();
            counter.feed_chunk(&mut second.to_vec()).unwrap();
            counter.finish().unwrap();
            assert_eq!(
                counts(counter.table()),
                vec![
                    ("cat".to_string(), 2),
                    ("sat".to_string(), 2),
                    ("the".to_string(), 2)
                ],
                "split at {split}"
            );
        }
    }

    #[test]
    fn test_empty_stream_reports_nothing() {
        let mut counter = WordCounter::new();
        counter.finish().unwrap();
        assert!(counter.report().unwrap().is_empty());
        assert_eq!(counter.summary(), Summary::default());
    }

    #[test]
    fn test_report_requires_finish() {
        let mut counter = WordCounter::new();
        counter.feed_chunk(&mut b"word".to_vec()).unwrap();
        assert!(matches!(counter.report(), Err(Error::NotFinished)));
        // The open word is only counted by finish
        assert_eq!(counter.table().find(b"word"), None);
        counter.finish().unwrap();
        assert_eq!(counter.table().find(b"word"), Some(1));
    }

    #[test]
    fn test_feed_after_finish_fails() {
        let mut counter = WordCounter::new();
        counter.finish().unwrap();
        assert!(matches!(
            counter.feed_chunk(&mut b"late".to_vec()),
            Err(Error::StreamFinished)
        ));
        counter.finish().unwrap();
        assert!(counter.is_finished());
    }

    #[test]
    fn test_with_config_inline_table() {
        let config = CounterConfig {
            initial_capacity: 2,
            max_load_factor: 0.7,
            ..CounterConfig::default()
        };
        let mut counter: WordCounter<InlineTable<Fnv1a>> =
            WordCounter::with_config(&config).unwrap();
        counter
            .feed_chunk(&mut b"one two three four five six seven one".to_vec())
            .unwrap();
        counter.finish().unwrap();
        let report = counter.full_report().unwrap();
        assert_eq!(report.summary.total_words, 8);
        assert_eq!(report.summary.unique_words, 7);
        assert_eq!(report.entries.iter().map(|e| e.count as u64).sum::<u64>(), 8);
        assert!(counter.table().capacity() >= 16);
    }

    #[test]
    fn test_with_config_rejects_bad_load_factor() {
        let config = CounterConfig {
            max_load_factor: 0.0,
            ..CounterConfig::default()
        };
        assert!(matches!(
            WordCounter::<ArenaTable>::with_config(&config),
            Err(Error::InvalidLoadFactor(_))
        ));
    }
}
