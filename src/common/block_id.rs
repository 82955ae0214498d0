//! Block identifier type.

use std::fmt;

use crate::common::config::{BLOCK_EXTENSION, TAIL_BLOCK_NAME};

/// Identifies one block file on disk.
///
/// Finalized blocks are numbered from 0 in the order they were dumped and
/// are never modified after creation. The tail is the single snapshot of the
/// newest, not yet finalized segment and is overwritten on every eviction.
///
/// # Example
/// ```
/// use spillbuf::BlockId;
///
/// assert_eq!(BlockId::Finalized(3).file_suffix(), "3.bin");
/// assert_eq!(BlockId::Tail.file_suffix(), "x.bin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// The N-th finalized block, holding `stop_idx` values.
    Finalized(usize),
    /// The tail snapshot.
    Tail,
}

impl BlockId {
    /// The suffix appended to the base path to name this block's file.
    pub fn file_suffix(&self) -> String {
        match self {
            BlockId::Finalized(n) => format!("{}.{}", n, BLOCK_EXTENSION),
            BlockId::Tail => format!("{}.{}", TAIL_BLOCK_NAME, BLOCK_EXTENSION),
        }
    }

    /// Check if this is the tail snapshot.
    #[inline]
    pub fn is_tail(&self) -> bool {
        matches!(self, BlockId::Tail)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Finalized(n) => write!(f, "Block({})", n),
            BlockId::Tail => write!(f, "Block(TAIL)"),
        }
    }
}
