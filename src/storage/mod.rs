//! Storage layer - block files and their encoding.
//!
//! This module handles paged-out data:
//! - [`BlockStore`] - Low-level file I/O for numbered blocks
//! - [`codec`] - The on-disk value encoding

mod block_store;
pub mod codec;

pub use block_store::BlockStore;
