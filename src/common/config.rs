//! Configuration constants and construction parameters for spillbuf.

use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Size of one stored value in bytes.
///
/// Values are written as big-endian IEEE-754 doubles, so a block of `n`
/// values occupies exactly `n × VALUE_SIZE` bytes on disk.
pub const VALUE_SIZE: usize = std::mem::size_of::<f64>();

/// Extension of every block file.
pub const BLOCK_EXTENSION: &str = "bin";

/// Name appended to the base path for the tail snapshot (`<base>x.bin`).
pub const TAIL_BLOCK_NAME: &str = "x";

/// Default window size in values (32KB of doubles).
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default share of the window kept resident after a dump.
pub const DEFAULT_RETAIN_PCT: u8 = 10;

/// Construction parameters for a [`PagingBuffer`](crate::PagingBuffer).
///
/// # Example
/// ```
/// use spillbuf::BufferConfig;
///
/// let config = BufferConfig::new("/tmp/spill/block")
///     .with_capacity(10)
///     .with_retain_pct(30);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.stop_idx(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferConfig {
    /// Number of values held in memory at once.
    pub capacity: usize,
    /// Percentage (0-100) of the window retained after each dump.
    pub retain_pct: u8,
    /// Prefix for all block files. Parent directories are created on demand.
    pub base_path: PathBuf,
}

impl BufferConfig {
    /// Create a config with default capacity and retention.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            retain_pct: DEFAULT_RETAIN_PCT,
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Set the window size.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the retained percentage.
    pub fn with_retain_pct(mut self, retain_pct: u8) -> Self {
        self.retain_pct = retain_pct;
        self
    }

    /// Number of values retained in the window after a dump.
    ///
    /// `floor(retain_pct / 100 × capacity)`, computed in integers.
    /// Returns `None` if the product overflows.
    #[inline]
    pub fn retained(&self) -> Option<usize> {
        self.capacity
            .checked_mul(self.retain_pct as usize)
            .map(|n| n / 100)
    }

    /// Number of values written to disk by each dump.
    ///
    /// 0 when the retention cannot be computed or covers the whole window.
    #[inline]
    pub fn stop_idx(&self) -> usize {
        self.retained()
            .map_or(0, |retained| self.capacity.saturating_sub(retained))
    }

    /// Check the parameters describe a buffer that can make progress.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if the capacity is zero, the
    /// percentage exceeds 100, the base path is empty, or the retention
    /// leaves nothing to dump.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be > 0".into()));
        }
        if self.retain_pct > 100 {
            return Err(Error::InvalidConfig(format!(
                "retain_pct must be within 0..=100, got {}",
                self.retain_pct
            )));
        }
        if self.base_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("base_path must not be empty".into()));
        }
        if self.retained().is_none() {
            return Err(Error::InvalidConfig(format!(
                "retaining {}% of {} values overflows",
                self.retain_pct, self.capacity
            )));
        }
        if self.stop_idx() == 0 {
            return Err(Error::InvalidConfig(format!(
                "retaining {}% of {} values leaves nothing to dump",
                self.retain_pct, self.capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_size() {
        assert_eq!(VALUE_SIZE, 8);
    }

    #[test]
    fn test_stop_idx() {
        let config = BufferConfig::new("blk").with_capacity(10).with_retain_pct(30);
        assert_eq!(config.retained(), Some(3));
        assert_eq!(config.stop_idx(), 7);

        // floor(0.99 * 10) = 9
        let config = config.with_retain_pct(99);
        assert_eq!(config.stop_idx(), 1);

        let config = config.with_retain_pct(0);
        assert_eq!(config.stop_idx(), 10);
    }

    #[test]
    fn test_defaults() {
        let config = BufferConfig::new("blk");
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.retain_pct, DEFAULT_RETAIN_PCT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let zero = BufferConfig::new("blk").with_capacity(0);
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));

        let too_much = BufferConfig::new("blk").with_retain_pct(101);
        assert!(matches!(too_much.validate(), Err(Error::InvalidConfig(_))));

        let keeps_all = BufferConfig::new("blk").with_capacity(10).with_retain_pct(100);
        assert!(matches!(keeps_all.validate(), Err(Error::InvalidConfig(_))));

        let no_path = BufferConfig::new("");
        assert!(matches!(no_path.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_single_slot_window() {
        let config = BufferConfig::new("blk").with_capacity(1).with_retain_pct(50);
        assert_eq!(config.stop_idx(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_capacity_overflow() {
        let config = BufferConfig::new("blk")
            .with_capacity(usize::MAX)
            .with_retain_pct(50);

        assert_eq!(config.retained(), None);
        assert_eq!(config.stop_idx(), 0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        // No retention means no multiplication to overflow
        let config = config.with_retain_pct(0);
        assert_eq!(config.stop_idx(), usize::MAX);
        assert!(config.validate().is_ok());
    }
}
