//! Byte counting and KB rounding.

use std::io;

use serde::Serialize;

use crate::error::Result;

pub const BYTES_PER_KB: f64 = 1024.0;

/// Decimal places kept for size tree nodes.
pub const NODE_PRECISION: i32 = 4;
/// Decimal places kept for aggregate totals reported to callers.
pub const TOTAL_PRECISION: i32 = 2;

/// `io::Write` sink that only counts bytes, so sizing never buffers the payload.
#[derive(Debug, Default)]
struct ByteCounter {
    len: usize,
}

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.len += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Byte length of the compact JSON encoding of `value`.
pub fn encoded_len<T: Serialize + ?Sized>(value: &T) -> Result<usize> {
    let mut counter = ByteCounter::default();
    serde_json::to_writer(&mut counter, value)?;
    Ok(counter.len)
}

pub fn bytes_to_kb(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_KB
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn round_node_kb(value: f64) -> f64 {
    round_to(value, NODE_PRECISION)
}

pub fn round_total_kb(value: f64) -> f64 {
    round_to(value, TOTAL_PRECISION)
}
