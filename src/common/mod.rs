//! Common types and utilities shared across spillbuf.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`BufferConfig`]
//! - Error types
//! - Identifiers ([`BlockId`])

mod block_id;
pub mod config;
pub mod error;

pub use block_id::BlockId;
pub use config::BufferConfig;
pub use error::{Error, Result};
