//! # Streaming Row Reader
//!
//! Drives the codec across an ordered schema, one row per call, with
//! precise partial-failure semantics:
//!
//! - end-of-input *before* any byte of a row is a clean end of the
//!   result set, not an error
//! - end-of-input *after* a row has started fails with the 1-based
//!   column index and the total column count, and the reader stays
//!   failed: later calls report no more rows instead of re-raising
//!
//! ## Row buffer policy
//!
//! The reader owns one row-shaped buffer. Under `reuse_records` that
//! buffer is recycled every row, so [`read_row`](RowReader::read_row)
//! borrows are cheap but must be cloned before the next read if
//! retained. In the default fresh mode,
//! [`read_record`](RowReader::read_record) hands the buffer out and
//! replaces it, so returned records are independently owned.

use crate::codec::decode_value;
use crate::config::CodecConfig;
use crate::encoding::varint::read_varint;
use crate::error::{Error, Result};
use crate::io::ByteInput;
use crate::types::{Column, Value};
use std::sync::Arc;

use super::{Record, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    AtRowBoundary,
    Exhausted,
    Failed,
}

pub struct RowReader<I> {
    input: I,
    schema: Arc<Schema>,
    config: CodecConfig,
    state: ReaderState,
    record: Record,
}

impl<I: ByteInput> RowReader<I> {
    /// Reader over a caller-supplied schema.
    pub fn new(input: I, schema: Arc<Schema>, config: CodecConfig) -> Self {
        let values = vec![Value::Null; schema.len()];
        Self {
            input,
            schema: Arc::clone(&schema),
            config,
            state: ReaderState::AtRowBoundary,
            record: Record::new(schema, values),
        }
    }

    /// Reader over an in-band schema header: a varint column count, that
    /// many length-prefixed names, then that many type-descriptor
    /// strings. An empty stream yields an empty schema with zero rows.
    pub fn with_header(mut input: I, config: CodecConfig) -> Result<Self> {
        if !input.has_more()? {
            return Ok(Self::new(input, Arc::new(Schema::empty()), config));
        }
        let count = config.check_length(read_varint(&mut input)?)?;
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            names.push(read_header_string(&mut input, &config)?);
        }
        let mut columns = Vec::with_capacity(count);
        for name in names {
            let descriptor = read_header_string(&mut input, &config)?;
            columns.push(Column::parse(name, &descriptor)?);
        }
        Ok(Self::new(input, Arc::new(Schema::new(columns)), config))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the byte source currently has unread bytes. This does
    /// not guarantee a complete row is present; the next read may still
    /// fail with a truncated-row error.
    pub fn has_more(&mut self) -> Result<bool> {
        if self.state != ReaderState::AtRowBoundary {
            return Ok(false);
        }
        self.input.has_more()
    }

    /// Reads the next row into the internal buffer and borrows it.
    /// Returns `Ok(None)` at the clean end of the result set.
    pub fn read_row(&mut self) -> Result<Option<&Record>> {
        if self.advance()? {
            Ok(Some(&self.record))
        } else {
            Ok(None)
        }
    }

    /// Reads the next row as an independently owned record. Under the
    /// reuse policy this clones the recycled buffer; in fresh mode the
    /// buffer is handed out and replaced.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if !self.advance()? {
            return Ok(None);
        }
        if self.config.reuse_records {
            return Ok(Some(self.record.clone()));
        }
        let fresh = vec![Value::Null; self.schema.len()];
        let values = self.record.replace_values(fresh);
        Ok(Some(Record::new(Arc::clone(&self.schema), values)))
    }

    /// Unwraps the reader, returning the byte source.
    pub fn into_input(self) -> I {
        self.input
    }

    fn advance(&mut self) -> Result<bool> {
        if self.state != ReaderState::AtRowBoundary {
            return Ok(false);
        }
        if self.schema.is_empty() || !self.input.has_more()? {
            self.state = ReaderState::Exhausted;
            return Ok(false);
        }

        let total = self.schema.len();
        let schema = Arc::clone(&self.schema);
        for idx in 0..total {
            let column = match schema.column(idx) {
                Some(column) => column,
                None => break,
            };
            let slot = &mut self.record.values_mut()[idx];
            if let Err(err) = decode_value(slot, &self.config, column, &mut self.input) {
                self.state = ReaderState::Failed;
                return Err(if truncation(&err) {
                    Error::TruncatedRow {
                        column: idx + 1,
                        total,
                    }
                } else {
                    err
                });
            }
        }
        Ok(true)
    }
}

/// End-of-input surfaced from inside a column decode, whether as a raw
/// short read or as a varint cut off mid-sequence.
fn truncation(err: &Error) -> bool {
    err.is_unexpected_eof() || matches!(err, Error::MalformedVarint("truncated varint"))
}

fn read_header_string<I: ByteInput>(input: &mut I, config: &CodecConfig) -> Result<String> {
    let length = config.check_length(read_varint(input)?)?;
    let mut buf = vec![0u8; length];
    input.read_bytes(&mut buf)?;
    String::from_utf8(buf).map_err(|_| Error::Conversion {
        from: "header bytes",
        to: "UTF-8 string".to_string(),
    })
}
