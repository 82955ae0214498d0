//! spillbuf - a disk-overflowing sequential buffer of `f64` values.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           spillbuf                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Buffer Layer (buffer/)                   │   │
//! │  │     PagingBuffer: append → dump, pop → evict/load,       │   │
//! │  │              range read across blocks                    │   │
//! │  │           Window (resident segment) + Stats              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Storage Layer (storage/)                    │   │
//! │  │   BlockStore: <base>0.bin .. <base>N.bin, <base>x.bin    │   │
//! │  │            codec: big-endian 8-byte doubles              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockId, Error, config)
//! - [`buffer`] - The paging buffer and its in-memory window
//! - [`storage`] - Block file I/O and encoding
//!
//! # Quick Start
//! ```no_run
//! use spillbuf::{BufferConfig, PagingBuffer};
//!
//! let config = BufferConfig::new("/tmp/spill/block").with_capacity(10).with_retain_pct(30);
//! let mut buf = PagingBuffer::new(config).unwrap();
//!
//! for i in 0..100 {
//!     buf.append(i as f64).unwrap();
//! }
//! assert_eq!(buf.size(), 100);
//! assert_eq!(buf.pop().unwrap(), 99.0);
//! assert_eq!(buf.read_range(3, 6).unwrap(), vec![3.0, 4.0, 5.0]);
//! // Block files are deleted when `buf` is dropped
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::{BufferConfig, VALUE_SIZE};
pub use common::{BlockId, Error, Result};

pub use buffer::{BufferStats, PagingBuffer, Window};
pub use storage::BlockStore;
