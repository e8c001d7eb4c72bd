//! # Row Writer
//!
//! The encode-side counterpart of the row reader: one call per row,
//! values encoded in schema order, with an optional in-band header that
//! the reader's `with_header` can parse back.

use crate::codec::encode_value;
use crate::config::CodecConfig;
use crate::encoding::varint::write_varint;
use crate::error::{Error, Result};
use crate::io::ByteOutput;
use crate::types::Value;
use std::sync::Arc;

use super::Schema;

pub struct RowWriter<O> {
    output: O,
    schema: Arc<Schema>,
    config: CodecConfig,
}

impl<O: ByteOutput> RowWriter<O> {
    pub fn new(output: O, schema: Arc<Schema>, config: CodecConfig) -> Self {
        Self {
            output,
            schema,
            config,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Writes the schema header: varint column count, length-prefixed
    /// names, then canonical type-descriptor strings.
    pub fn write_header(&mut self) -> Result<()> {
        write_varint(self.schema.len() as u64, &mut self.output)?;
        for column in self.schema.columns() {
            write_header_string(column.name(), &mut self.output)?;
        }
        for column in self.schema.columns() {
            write_header_string(&column.type_string(), &mut self.output)?;
        }
        Ok(())
    }

    /// Encodes one row. The value count must match the schema exactly.
    pub fn write_row(&mut self, values: &[Value]) -> Result<()> {
        if values.len() != self.schema.len() {
            return Err(Error::ColumnCountMismatch {
                expected: self.schema.len(),
                actual: values.len(),
            });
        }
        for (column, value) in self.schema.columns().iter().zip(values) {
            encode_value(value, &self.config, column, &mut self.output)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush_output()
    }

    /// Unwraps the writer, returning the byte sink.
    pub fn into_output(self) -> O {
        self.output
    }
}

fn write_header_string<O: ByteOutput>(text: &str, out: &mut O) -> Result<()> {
    write_varint(text.len() as u64, out)?;
    out.write_bytes(text.as_bytes())
}
