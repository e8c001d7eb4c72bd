//! # Variable-Length Integer Encoding
//!
//! Unsigned LEB128 (little-endian base-128) varints, used by RowBinary
//! for every length and count prefix: string byte lengths, array element
//! counts, map pair counts, nested-column lengths and header column
//! counts. This is NOT a general integer codec; values themselves use
//! fixed-width little-endian encoding.
//!
//! ## Encoding Format
//!
//! Each byte carries 7 value bits, least-significant group first; the
//! high bit is set on every byte except the last:
//!
//! | Value Range | Bytes | Example |
//! |-------------|-------|---------|
//! | 0 - 127 | 1 | `0x7F` = 127 |
//! | 128 - 16383 | 2 | `0x80 0x01` = 128 |
//! | 16384 - 2097151 | 3 | `0x80 0x80 0x01` = 16384 |
//! | ... | ... | up to 10 bytes for `u64::MAX` |
//!
//! ## Error Handling
//!
//! `read_varint` fails on:
//! - end-of-input before a terminating byte ("truncated varint")
//! - a sequence that has not terminated after 10 bytes
//! - a 10th byte contributing bits beyond the 64-bit range (overlong)

use crate::error::{Error, Result};
use crate::io::{ByteInput, ByteOutput};

/// Maximum encoded length of a u64 varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Returns the encoded byte length of `value` without encoding it.
pub fn varint_len(value: u64) -> usize {
    if value == 0 {
        return 1;
    }
    (64 - value.leading_zeros() as usize).div_ceil(7)
}

/// Writes `value` as an LEB128 varint.
pub fn write_varint<O: ByteOutput + ?Sized>(value: u64, out: &mut O) -> Result<()> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut rest = value;
    let mut len = 0;
    loop {
        let byte = (rest & 0x7F) as u8;
        rest >>= 7;
        if rest == 0 {
            buf[len] = byte;
            len += 1;
            break;
        }
        buf[len] = byte | 0x80;
        len += 1;
    }
    out.write_bytes(&buf[..len])
}

/// Reads an LEB128 varint, rejecting truncated and overlong sequences.
pub fn read_varint<I: ByteInput + ?Sized>(input: &mut I) -> Result<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    for _ in 0..MAX_VARINT_LEN {
        let byte = input.read_byte().map_err(|e| {
            if e.is_unexpected_eof() {
                Error::MalformedVarint("truncated varint")
            } else {
                e
            }
        })?;
        let bits = (byte & 0x7F) as u64;
        if shift == 63 && bits > 1 {
            return Err(Error::MalformedVarint("overflows 64 bits"));
        }
        value |= bits << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
    Err(Error::MalformedVarint("no terminator within 10 bytes"))
}
