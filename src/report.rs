//! Turning a filled table into frequency entries.

use std::borrow::Cow;

use compact_str::CompactString;
use serde::Serialize;

use crate::table::{Count, FrequencyTable};

/// One `(count, word)` pair of the final result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub count: Count,
    pub word: CompactString,
}

impl FrequencyEntry {
    pub fn new(count: Count, word: &[u8]) -> Self {
        // Words are ASCII letters, so the lossy conversion never replaces anything
        let word = match String::from_utf8_lossy(word) {
            Cow::Borrowed(word) => CompactString::new(word),
            Cow::Owned(word) => CompactString::from(word),
        };
        Self { count, word }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Words emitted by the tokenizer, duplicates included
    pub total_words: u64,
    /// Distinct words in the table
    pub unique_words: usize,
}

/// Everything a caller needs to print or serialize a finished count
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub summary: Summary,
    pub entries: Vec<FrequencyEntry>,
}

/// Drains `table` into entries, in table iteration order
pub fn collect<T: FrequencyTable>(table: &T) -> Vec<FrequencyEntry> {
    let mut entries = Vec::with_capacity(table.len());
    entries.extend(
        table
            .drain()
            .map(|(count, word)| FrequencyEntry::new(count, word)),
    );
    entries
}

/// Orders entries by count descending, breaking ties alphabetically
pub fn sort_by_frequency(entries: &mut [FrequencyEntry]) {
    entries.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
}
