//! Error types for spillbuf.

use thiserror::Error;

use crate::common::BlockId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by a [`PagingBuffer`](crate::PagingBuffer).
///
/// Two families live here:
/// - contract violations (`InvalidRange`, `OutOfBounds`, `Exhausted`,
///   `InvalidConfig`), which leave the buffer untouched
/// - storage failures (`Io`, `CorruptBlock`, `Poisoned`), after which the
///   in-memory window and the block files may disagree
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from a block file read, write or delete.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `read_range` was called with `start > end`.
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange { start: usize, end: usize },

    /// A range index lies past the end of the logical sequence.
    #[error("range {start}..{end} is out of bounds for buffer of size {size}")]
    OutOfBounds { start: usize, end: usize, size: usize },

    /// `pop` walked past the oldest value ever written.
    #[error("no values left to pop")]
    Exhausted,

    /// Construction parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A block file does not hold the number of values it must.
    ///
    /// Raised for truncated files and files whose length is not a
    /// multiple of the value size.
    #[error("{block} holds {found} values, expected {expected}")]
    CorruptBlock {
        block: BlockId,
        expected: usize,
        found: usize,
    },

    /// A storage failure already happened on this buffer.
    #[error("buffer is unusable after an earlier storage failure")]
    Poisoned,
}

impl Error {
    /// Whether this error came from (or was caused by) the storage layer.
    ///
    /// Storage failures are fatal for the buffer instance that raised them.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::CorruptBlock { .. } | Error::Poisoned
        )
    }
}
