//! Byte encoding of stored values.
//!
//! Block files are a flat sequence of values with no header:
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       8     value 0 (f64, big-endian)
//! 8       8     value 1 (f64, big-endian)
//! ...
//! 8×(n-1) 8     value n-1
//! ```

use crate::common::config::VALUE_SIZE;

/// Append the big-endian encoding of `values` to `out`.
pub fn encode_into(values: &[f64], out: &mut Vec<u8>) {
    out.reserve(values.len() * VALUE_SIZE);
    for value in values {
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Number of whole values encoded in `len` bytes, or `None` if `len` is
/// not a multiple of [`VALUE_SIZE`].
#[inline]
pub fn value_count(len: usize) -> Option<usize> {
    (len % VALUE_SIZE == 0).then_some(len / VALUE_SIZE)
}

/// Decode `bytes` into the front of `out`, returning the number of values.
///
/// # Panics
/// Panics if `bytes` is not a whole number of values or does not fit in `out`.
pub fn decode_into(bytes: &[u8], out: &mut [f64]) -> usize {
    let count = value_count(bytes.len()).expect("partial value in encoded block");
    assert!(count <= out.len(), "decoded block does not fit in window");

    for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(VALUE_SIZE)) {
        let mut raw = [0u8; VALUE_SIZE];
        raw.copy_from_slice(chunk);
        *slot = f64::from_be_bytes(raw);
    }
    count
}
