//! Error types for the `wordfreq` crate

/// Result type alias using our Error
pub type Result<T> = core::result::Result<T, Error>;

/// Errors surfaced by the counting core and the stream driver
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The table would have to grow past the largest supported bucket array.
    #[error("table capacity overflow: {requested} buckets requested")]
    CapacityOverflow { requested: usize },

    /// Allocating the grown bucket array failed.
    #[error("could not allocate a table of {capacity} buckets")]
    AllocationFailed { capacity: usize },

    /// Load factors must lie strictly between 0 and 1.
    #[error("invalid max load factor {0}, expected a value in (0, 1)")]
    InvalidLoadFactor(f32),

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A chunk was fed after the stream was finished.
    #[error("stream already finished")]
    StreamFinished,

    /// A report was requested before the stream was finished.
    #[error("stream not finished yet, call finish() before report()")]
    NotFinished,

    /// Reading the input stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
