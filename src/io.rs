//! # Byte-Stream Boundary
//!
//! This module defines the narrow seam between the codec and whatever
//! transport supplies the bytes. The codec needs exactly four read
//! capabilities and two write capabilities; compression, TLS, retries and
//! connection pooling all live on the far side of these traits.
//!
//! ## Read contract
//!
//! | Method | Behavior |
//! |--------|----------|
//! | `read_bytes` | Fill the buffer exactly; EOF mid-fill is an error |
//! | `read_byte` | One byte; EOF is an error |
//! | `try_read_byte` | One byte, or `None` on clean end-of-input |
//! | `has_more` | Whether unread bytes are currently available, without blocking past `fill_buf` |
//!
//! The distinction between `read_byte` and `try_read_byte` is what lets
//! the row reader tell a clean end of result set (EOF before any byte of
//! a row) apart from a truncated row (EOF after one).
//!
//! Both traits have blanket impls: any `BufRead` is a `ByteInput`, any
//! `Write` is a `ByteOutput`. In-memory slices work through
//! `std::io::Cursor` / `&[u8]`.

use crate::error::{Error, Result};
use std::io::{BufRead, ErrorKind, Write};

/// Ordered byte source consumed by the decoder.
pub trait ByteInput {
    /// Reads exactly `buf.len()` bytes. End-of-input before the buffer
    /// is full is an `UnexpectedEof` I/O error.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads a single byte (markers, flags).
    fn read_byte(&mut self) -> Result<u8>;

    /// Reads a single byte, returning `None` on clean end-of-input.
    fn try_read_byte(&mut self) -> Result<Option<u8>>;

    /// Reports whether unread bytes are currently available. This does
    /// not guarantee a complete row is present.
    fn has_more(&mut self) -> Result<bool>;
}

impl<R: BufRead> ByteInput for R {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read_exact(buf)
            .map_err(|e| Error::io(format!("reading {} bytes", buf.len()), e))
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)
            .map_err(|e| Error::io("reading one byte", e))?;
        Ok(buf[0])
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>> {
        let available = self
            .fill_buf()
            .map_err(|e| Error::io("peeking byte source", e))?;
        match available.first().copied() {
            Some(byte) => {
                self.consume(1);
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    fn has_more(&mut self) -> Result<bool> {
        match self.fill_buf() {
            Ok(buf) => Ok(!buf.is_empty()),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(Error::io("peeking byte source", e)),
        }
    }
}

/// Ordered byte sink fed by the encoder.
pub trait ByteOutput {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()>;

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bytes(&[byte])
    }

    fn flush_output(&mut self) -> Result<()>;
}

impl<W: Write> ByteOutput for W {
    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf)
            .map_err(|e| Error::io(format!("writing {} bytes", buf.len()), e))
    }

    fn flush_output(&mut self) -> Result<()> {
        self.flush().map_err(|e| Error::io("flushing byte sink", e))
    }
}
