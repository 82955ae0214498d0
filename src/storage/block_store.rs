//! Block Store - file I/O for paged-out blocks.
//!
//! The [`BlockStore`] handles all direct file operations:
//! - Writing finalized blocks and the tail snapshot
//! - Loading a block back into a window
//! - Deleting every file it created

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::common::config::VALUE_SIZE;
use crate::common::{BlockId, Error, Result};
use crate::storage::codec;

/// Manages the block files that share one base path.
///
/// # File Layout
/// Every block is its own file, named by appending a suffix to the base path:
/// ```text
/// <base>0.bin   finalized block 0   (stop_idx values)
/// <base>1.bin   finalized block 1   (stop_idx values)
/// ...
/// <base>x.bin   tail snapshot       (overwritten on each eviction)
/// ```
///
/// # Ownership
/// The store remembers which files it created and deletes exactly those,
/// either through [`remove_all`](BlockStore::remove_all) or on drop.
///
/// # Durability
/// Writes are not synced. Block files only live as long as the store.
pub struct BlockStore {
    base_path: PathBuf,
    /// Number of finalized block files created.
    blocks_created: usize,
    /// Whether the tail snapshot exists on disk.
    tail_written: bool,
    /// Scratch buffer reused for encoding and decoding.
    scratch: Vec<u8>,
}

impl BlockStore {
    /// Open a store rooted at `base_path`, creating parent directories.
    ///
    /// A base path ending in a separator names a directory; block files are
    /// then placed directly inside it (`dir/0.bin`).
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created.
    pub fn create<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();

        if let Some(dir) = Self::directory_of(&base_path) {
            fs::create_dir_all(dir)?;
        }

        Ok(Self {
            base_path,
            blocks_created: 0,
            tail_written: false,
            scratch: Vec::new(),
        })
    }

    fn directory_of(base_path: &Path) -> Option<&Path> {
        let names_directory = base_path
            .as_os_str()
            .to_string_lossy()
            .ends_with(std::path::is_separator);

        let dir = if names_directory {
            Some(base_path)
        } else {
            base_path.parent()
        };
        dir.filter(|d| !d.as_os_str().is_empty())
    }

    /// Full path of a block's file.
    pub fn path_for(&self, block: BlockId) -> PathBuf {
        let mut name = self.base_path.clone().into_os_string();
        name.push(block.file_suffix());
        PathBuf::from(name)
    }

    /// Write a block, replacing any previous contents of its file.
    ///
    /// Finalized blocks must be written in order, each exactly once.
    ///
    /// # Errors
    /// Returns I/O errors from creating or writing the file.
    pub fn write_block(&mut self, block: BlockId, values: &[f64]) -> Result<()> {
        if let BlockId::Finalized(n) = block {
            debug_assert_eq!(n, self.blocks_created, "finalized blocks are append-only");
        }

        self.scratch.clear();
        codec::encode_into(values, &mut self.scratch);

        let mut file = File::create(self.path_for(block))?;

        // The file exists from here on, even if the write below fails
        if block.is_tail() {
            self.tail_written = true;
        } else {
            self.blocks_created += 1;
        }

        file.write_all(&self.scratch)?;

        debug!(%block, values = values.len(), "wrote block");
        Ok(())
    }

    /// Read a block into the front of `out`.
    ///
    /// Returns the number of values read, which always equals `expected`.
    ///
    /// # Errors
    /// - `Error::Io` if the file is missing or unreadable
    /// - `Error::CorruptBlock` if the file does not hold exactly `expected`
    ///   whole values, or holds more than `out` can take
    pub fn read_block(&mut self, block: BlockId, out: &mut [f64], expected: usize) -> Result<usize> {
        let mut file = File::open(self.path_for(block))?;

        self.scratch.clear();
        file.read_to_end(&mut self.scratch)?;

        let whole = codec::value_count(self.scratch.len()).is_some();
        let found = self.scratch.len() / VALUE_SIZE;
        if !whole || found != expected || found > out.len() {
            return Err(Error::CorruptBlock {
                block,
                expected,
                found,
            });
        }

        let count = codec::decode_into(&self.scratch, out);
        debug!(%block, values = count, "loaded block");
        Ok(count)
    }

    /// Number of finalized block files created.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks_created
    }

    /// Whether a tail snapshot has been written.
    #[inline]
    pub fn has_tail(&self) -> bool {
        self.tail_written
    }

    /// Delete every file this store created.
    ///
    /// Deletion continues past failures; the first one is returned. Files
    /// that are already gone are not an error. Afterwards the store owns no
    /// files, so calling this again is a no-op.
    ///
    /// # Errors
    /// Returns the first I/O error other than `NotFound`.
    pub fn remove_all(&mut self) -> Result<()> {
        let mut blocks: Vec<BlockId> = (0..self.blocks_created).map(BlockId::Finalized).collect();
        if self.tail_written {
            blocks.push(BlockId::Tail);
        }

        self.blocks_created = 0;
        self.tail_written = false;

        let mut first_error = None;
        for block in blocks {
            match fs::remove_file(self.path_for(block)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(Error::Io(e)),
            None => Ok(()),
        }
    }
}

impl Drop for BlockStore {
    fn drop(&mut self) {
        if let Err(e) = self.remove_all() {
            warn!(base_path = %self.base_path.display(), error = %e, "failed to remove block files");
        }
    }
}
