//! Paging statistics tracking.

use std::fmt;

/// I/O counters kept by a [`PagingBuffer`](crate::PagingBuffer).
///
/// The buffer is single-threaded, so these are plain counters. Call
/// [`PagingBuffer::stats`](crate::PagingBuffer::stats) for a copy.
///
/// # Example
/// ```
/// use spillbuf::BufferStats;
///
/// let stats = BufferStats::default();
/// assert_eq!(stats.blocks_written, 0);
/// println!("{}", stats);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BufferStats {
    /// Finalized blocks dumped to disk.
    pub blocks_written: u64,

    /// Finalized blocks loaded back into the window.
    pub blocks_read: u64,

    /// Tail snapshots written on eviction.
    pub tail_writes: u64,

    /// Evictions that skipped the write because the snapshot was current.
    pub tail_writes_skipped: u64,

    /// Tail snapshots loaded back into the window.
    pub tail_reads: u64,
}

impl BufferStats {
    /// Total number of file writes.
    pub fn total_writes(&self) -> u64 {
        self.blocks_written + self.tail_writes
    }

    /// Total number of file reads.
    pub fn total_reads(&self) -> u64 {
        self.blocks_read + self.tail_reads
    }
}

impl fmt::Display for BufferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ blocks written: {}, blocks read: {}, tail writes: {} ({} skipped), tail reads: {} }}",
            self.blocks_written,
            self.blocks_read,
            self.tail_writes,
            self.tail_writes_skipped,
            self.tail_reads
        )
    }
}
