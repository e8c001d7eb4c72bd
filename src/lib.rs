//! # rowbinary
//!
//! A client-side codec for the RowBinary wire format: the row-oriented
//! binary encoding used by ClickHouse-compatible servers. One row on the
//! wire is the concatenation of each column's encoded value in schema
//! order; this crate converts between that byte stream and typed,
//! in-memory row values for the full set of scalar and composite column
//! types, including nullable wrappers, recursive composites and the
//! `groupBitmap` aggregate state.
//!
//! ## Architecture
//!
//! ```text
//! +----------------------------------------------------------+
//! |                    records (rows)                        |
//! |        Schema / Record / RowReader / RowWriter           |
//! +----------------------------------------------------------+
//! |                  codec (dispatch)                        |
//! |       exhaustive per-type decode_value / encode_value    |
//! +---------------------------+------------------------------+
//! |      types (model)        |     encoding (primitives)    |
//! |  DataType, Column, Value  |  varint, fixed-width LE,     |
//! |  descriptor parser        |  decimal, bitmap             |
//! +---------------------------+------------------------------+
//! |                  io (byte boundary)                      |
//! |              ByteInput / ByteOutput traits               |
//! +----------------------------------------------------------+
//! ```
//!
//! ## Module Overview
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`io`] | the four read and two write capabilities the codec needs |
//! | [`encoding`] | byte-level primitives shared by all column codecs |
//! | [`types`] | column descriptors, the tag enum, the value model |
//! | [`codec`] | per-column encode/decode, one exhaustive match each way |
//! | [`records`] | schemas, rows, the streaming reader and writer |
//! | [`config`] | time zones, the reuse policy, the buffer ceiling |
//! | [`error`] | the typed failure taxonomy |
//!
//! ## Example
//!
//! ```
//! use rowbinary::{CodecConfig, Column, DataType, RowReader, RowWriter, Schema, Value};
//! use std::sync::Arc;
//!
//! # fn main() -> rowbinary::Result<()> {
//! let schema = Arc::new(Schema::new(vec![
//!     Column::new("id", DataType::Int32),
//!     Column::new("name", DataType::String).nullable()?,
//! ]));
//!
//! let mut writer = RowWriter::new(Vec::new(), Arc::clone(&schema), CodecConfig::default());
//! writer.write_row(&[Value::Int32(1), Value::String(b"one".to_vec())])?;
//! writer.write_row(&[Value::Int32(2), Value::Null])?;
//! let bytes = writer.into_output();
//!
//! let mut reader = RowReader::new(bytes.as_slice(), schema, CodecConfig::default());
//! while let Some(row) = reader.read_row()? {
//!     println!("{:?}", row.value(0));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! The codec is purely synchronous with no internal locking. A reader,
//! its records and the byte stream it wraps belong to one thread at a
//! time; confining each stream is the caller's obligation.

pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod io;
pub mod records;
pub mod types;

pub use codec::{decode_value, encode_value};
pub use config::{CodecConfig, DEFAULT_MAX_BUFFER_SIZE};
pub use error::{Error, Result};
pub use io::{ByteInput, ByteOutput};
pub use records::{Record, RowReader, RowWriter, Schema};
pub use types::{Array, Column, DataType, EnumTable, Value};
