//! Driving a [`WordCounter`] from any [`Read`] source.

use std::io::{ErrorKind, Read};

use log::debug;

use crate::counter::WordCounter;
use crate::error::{Error, Result};
use crate::table::FrequencyTable;
use crate::tokenizer::WordSink;

/// Reads `reader` to the end in chunks of `chunk_size` bytes, feeding each
/// one to `counter`. Returns the number of bytes read.
///
/// The stream is not finished, so several readers can be chained into one
/// count before calling [`WordCounter::finish`].
pub fn feed_reader<T, R>(
    counter: &mut WordCounter<T>,
    mut reader: R,
    chunk_size: usize,
) -> Result<u64>
where
    T: FrequencyTable + WordSink<Error = Error>,
    R: Read,
{
    if chunk_size == 0 {
        return Err(Error::InvalidConfig("chunk_size must be at least 1".into()));
    }
    let mut buffer = vec![0u8; chunk_size];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        total += read as u64;
        counter.feed_chunk(&mut buffer[..read])?;
    }
    debug!(
        "read {} bytes, {} words so far",
        total,
        counter.words_counted()
    );
    Ok(total)
}
