//! Buffer management.
//!
//! The buffer layer keeps one window of values in memory and pages the
//! rest through the storage layer.
//!
//! # Components
//! - [`PagingBuffer`] - The append/pop/range-read state machine
//! - [`Window`] - The fixed-capacity resident segment and its cursors
//! - [`BufferStats`] - I/O counters

mod paging_buffer;
mod stats;
mod window;

pub use paging_buffer::PagingBuffer;
pub use stats::BufferStats;
pub use window::Window;
