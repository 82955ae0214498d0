//! Paging Buffer - the disk-overflowing sequential buffer.
//!
//! The [`PagingBuffer`] provides:
//! - Unbounded appends with a fixed memory footprint
//! - LIFO pops that walk backward through paged-out history
//! - Ascending range reads over the whole logical sequence
//! - Cleanup of every block file when the buffer goes away

use tracing::{debug, trace, warn};

use crate::buffer::{BufferStats, Window};
use crate::common::{BlockId, BufferConfig, Error, Result};
use crate::storage::BlockStore;

/// A logically unbounded sequence of `f64` values backed by block files.
///
/// # Architecture
/// ```text
/// logical positions:  0                                         size-1
///                     ├─ block 0 ─┼─ block 1 ─┼ ... ┼─ block N-1 ─┼── tail ──┤
///                     │ stop_idx  │ stop_idx  │     │  stop_idx   │ < cap    │
///                     └───────────┴───────────┴─────┴─────────────┴──────────┘
///                       <base>0.bin  <base>1.bin       <base>N-1.bin  window or
///                                                                   <base>x.bin
/// ```
///
/// Exactly one of these segments is resident in the window at a time.
/// While writing, the tail is resident. Popping past the front of the window
/// evicts the tail to `<base>x.bin` and loads the finalized blocks one by one,
/// newest first. The next append reloads the tail.
///
/// # Cursor semantics
/// History is append-only. `pop` moves a read cursor backward and never
/// discards data; `append` always resumes at the end of history, so popping
/// after an append yields the new values followed by all older values again.
/// [`size`](PagingBuffer::size) counts every value ever appended.
///
/// # Thread Safety
/// Single-threaded. Every operation takes `&mut self` and blocks on its file
/// I/O.
///
/// # Usage
/// ```no_run
/// use spillbuf::{BufferConfig, PagingBuffer};
///
/// let config = BufferConfig::new("/tmp/spill/block")
///     .with_capacity(10)
///     .with_retain_pct(30);
/// let mut buf = PagingBuffer::new(config)?;
///
/// buf.append_batch(&[1.0, 2.0, 3.0])?;
/// assert_eq!(buf.pop()?, 3.0);
/// assert_eq!(buf.read_range(0, 2)?, vec![1.0, 2.0]);
///
/// buf.close()?;
/// # Ok::<(), spillbuf::Error>(())
/// ```
pub struct PagingBuffer {
    /// The resident segment.
    window: Window,

    /// Block files under the base path.
    store: BlockStore,

    config: BufferConfig,

    /// Values moved to disk per dump.
    stop_idx: usize,

    /// Values ever appended.
    logical_size: usize,

    /// Write mode: equal to `max_file_counter`.
    /// Read mode: the resident finalized block.
    file_counter: usize,

    /// Finalized blocks ever created.
    max_file_counter: usize,

    /// The tail lives in `<base>x.bin`, not in the window.
    tail_evicted: bool,

    /// The tail changed since it was last written out.
    tail_dirty: bool,

    /// A storage failure left window and disk possibly inconsistent.
    poisoned: bool,

    stats: BufferStats,
}

/// Position of the pop cursor: which segment is resident, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    block: BlockId,
    head: usize,
}

impl PagingBuffer {
    /// Create an empty buffer.
    ///
    /// # Errors
    /// - `Error::InvalidConfig` if the configuration is rejected
    /// - I/O errors from creating the base path's parent directories
    pub fn new(config: BufferConfig) -> Result<Self> {
        config.validate()?;

        let store = BlockStore::create(&config.base_path)?;
        let stop_idx = config.stop_idx();

        debug!(
            capacity = config.capacity,
            stop_idx,
            base_path = %config.base_path.display(),
            "created paging buffer"
        );

        Ok(Self {
            window: Window::new(config.capacity),
            store,
            config,
            stop_idx,
            logical_size: 0,
            file_counter: 0,
            max_file_counter: 0,
            tail_evicted: false,
            // No snapshot exists yet, so the first eviction must write one
            tail_dirty: true,
            poisoned: false,
            stats: BufferStats::default(),
        })
    }

    // ========================================================================
    // Public API: Write path
    // ========================================================================

    /// Append one value at the end of history.
    ///
    /// # Errors
    /// Storage failures from reloading the tail or dumping a full window.
    pub fn append(&mut self, value: f64) -> Result<()> {
        self.check_usable()?;
        let result = self.append_internal(value);
        self.track(result)
    }

    /// Append a run of values. Equivalent to calling [`append`] for each,
    /// but copies in bulk.
    ///
    /// An empty slice performs no I/O.
    ///
    /// [`append`]: PagingBuffer::append
    ///
    /// # Errors
    /// Storage failures from reloading the tail or dumping a full window.
    pub fn append_batch(&mut self, values: &[f64]) -> Result<()> {
        self.check_usable()?;
        if values.is_empty() {
            return Ok(());
        }
        let result = self.append_batch_internal(values);
        self.track(result)
    }

    // ========================================================================
    // Public API: Read path
    // ========================================================================

    /// Step the read cursor back and return the value under it.
    ///
    /// # Errors
    /// - `Error::Exhausted` once the cursor reaches the oldest value
    /// - storage failures from evicting the tail or loading a block
    pub fn pop(&mut self) -> Result<f64> {
        self.check_usable()?;

        if let Some(value) = self.window.pop() {
            return Ok(value);
        }

        let result = self.step_back();
        self.track(result)?;

        self.window.pop().ok_or(Error::Exhausted)
    }

    /// Read logical positions `start..end`, oldest first.
    ///
    /// The pop cursor is left where it was.
    ///
    /// # Errors
    /// - `Error::InvalidRange` if `start > end`
    /// - `Error::OutOfBounds` if either index exceeds [`size`](Self::size)
    /// - storage failures from loading blocks
    pub fn read_range(&mut self, start: usize, end: usize) -> Result<Vec<f64>> {
        self.check_usable()?;

        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        if start > self.logical_size || end > self.logical_size {
            return Err(Error::OutOfBounds {
                start,
                end,
                size: self.logical_size,
            });
        }
        if start == end {
            return Ok(Vec::new());
        }

        let mut out = Vec::with_capacity(end - start);
        let result = self.read_range_internal(start, end, &mut out);
        self.track(result)?;

        Ok(out)
    }

    // ========================================================================
    // Public API: Lifecycle and info
    // ========================================================================

    /// Delete every block file and consume the buffer.
    ///
    /// Dropping the buffer does the same but can only log failures.
    ///
    /// # Errors
    /// Returns the first deletion failure.
    pub fn close(mut self) -> Result<()> {
        debug!(blocks = self.store.block_count(), "closing paging buffer");
        self.store.remove_all()
    }

    /// Number of values ever appended.
    #[inline]
    pub fn size(&self) -> usize {
        self.logical_size
    }

    /// Check if nothing was ever appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.logical_size == 0
    }

    /// Window size in values.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Values moved to disk per dump (the size of every finalized block).
    #[inline]
    pub fn stop_idx(&self) -> usize {
        self.stop_idx
    }

    /// Number of finalized blocks on disk.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.max_file_counter
    }

    /// The configuration this buffer was built from.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// A copy of the I/O counters.
    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    /// Check if an earlier storage failure made the buffer unusable.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    // ========================================================================
    // Internal: Failure tracking
    // ========================================================================

    fn check_usable(&self) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        Ok(())
    }

    /// Poison the buffer if `result` is a storage failure.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_storage_failure() {
                warn!(error = %e, "storage failure, buffer poisoned");
                self.poisoned = true;
            }
        }
        result
    }

    // ========================================================================
    // Internal: Write path
    // ========================================================================

    fn append_internal(&mut self, value: f64) -> Result<()> {
        self.resume_writing()?;

        self.window.push(value);
        self.logical_size += 1;
        self.tail_dirty = true;

        if self.window.is_full() {
            self.dump()?;
        }
        Ok(())
    }

    fn append_batch_internal(&mut self, mut values: &[f64]) -> Result<()> {
        self.resume_writing()?;

        while !values.is_empty() {
            let n = self.window.push_slice(values);
            self.logical_size += n;
            self.tail_dirty = true;
            values = &values[n..];

            if self.window.is_full() {
                self.dump()?;
            }
        }
        Ok(())
    }

    /// Bring the tail back and put the cursor at the end of history.
    fn resume_writing(&mut self) -> Result<()> {
        self.load(BlockId::Tail)?;
        self.window.seek_end();
        Ok(())
    }

    /// Move the oldest `stop_idx` values of a full window into a new
    /// finalized block.
    fn dump(&mut self) -> Result<()> {
        debug_assert!(self.window.is_full());

        let block = BlockId::Finalized(self.max_file_counter);
        self.store
            .write_block(block, &self.window.valid()[..self.stop_idx])?;

        self.max_file_counter += 1;
        self.file_counter = self.max_file_counter;
        self.window.shift_retained(self.stop_idx);
        self.tail_dirty = true;
        self.stats.blocks_written += 1;

        debug!(%block, retained = self.window.max_head(), "dumped window");
        Ok(())
    }

    // ========================================================================
    // Internal: Read path
    // ========================================================================

    /// Load the block just older than the resident segment.
    fn step_back(&mut self) -> Result<()> {
        let older = self.file_counter.checked_sub(1).ok_or(Error::Exhausted)?;
        trace!(block = older, "cursor stepping back");
        self.load(BlockId::Finalized(older))
    }

    fn read_range_internal(&mut self, start: usize, end: usize, out: &mut Vec<f64>) -> Result<()> {
        let cursor = self.cursor();

        let mut pos = start;
        while pos < end {
            let (block, offset) = self.locate(pos);
            self.load(block)?;

            let valid = self.window.valid();
            let take = (valid.len() - offset).min(end - pos);
            out.extend_from_slice(&valid[offset..offset + take]);
            pos += take;
        }

        self.restore(cursor)
    }

    /// Block holding logical position `pos`, and the offset within it.
    fn locate(&self, pos: usize) -> (BlockId, usize) {
        let tail_start = self.tail_start();
        if pos >= tail_start {
            (BlockId::Tail, pos - tail_start)
        } else {
            (BlockId::Finalized(pos / self.stop_idx), pos % self.stop_idx)
        }
    }

    fn cursor(&self) -> Cursor {
        Cursor {
            block: self.resident(),
            head: self.window.head(),
        }
    }

    fn restore(&mut self, cursor: Cursor) -> Result<()> {
        self.load(cursor.block)?;
        self.window.seek(cursor.head);
        Ok(())
    }

    // ========================================================================
    // Internal: Window transitions
    // ========================================================================

    /// The segment currently in the window.
    fn resident(&self) -> BlockId {
        if self.tail_evicted {
            BlockId::Finalized(self.file_counter)
        } else {
            BlockId::Tail
        }
    }

    /// First logical position held by the tail.
    #[inline]
    fn tail_start(&self) -> usize {
        self.max_file_counter * self.stop_idx
    }

    /// Make `block` the resident segment, with the cursor at its end.
    ///
    /// A resident tail is saved before anything replaces it. Loading the
    /// segment that is already resident does nothing, cursor included.
    fn load(&mut self, block: BlockId) -> Result<()> {
        if block == self.resident() {
            return Ok(());
        }

        if !self.tail_evicted {
            self.evict_tail()?;
        }

        match block {
            BlockId::Finalized(n) => {
                let count = self
                    .store
                    .read_block(block, self.window.slots_mut(), self.stop_idx)?;
                self.window.set_loaded(count);
                self.file_counter = n;
                self.stats.blocks_read += 1;
            }
            BlockId::Tail => {
                let expected = self.logical_size - self.tail_start();
                let count = self
                    .store
                    .read_block(block, self.window.slots_mut(), expected)?;
                self.window.set_loaded(count);
                self.tail_evicted = false;
                self.file_counter = self.max_file_counter;
                self.stats.tail_reads += 1;
            }
        }
        Ok(())
    }

    /// Save the resident tail to its snapshot file.
    fn evict_tail(&mut self) -> Result<()> {
        debug_assert!(!self.tail_evicted);
        debug_assert_eq!(
            self.window.max_head(),
            self.logical_size - self.tail_start()
        );

        if self.tail_dirty || !self.store.has_tail() {
            self.store.write_block(BlockId::Tail, self.window.valid())?;
            self.tail_dirty = false;
            self.stats.tail_writes += 1;
        } else {
            self.stats.tail_writes_skipped += 1;
        }

        self.tail_evicted = true;
        debug!(values = self.window.max_head(), "evicted tail");
        Ok(())
    }
}
