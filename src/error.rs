//! # Codec Error Taxonomy
//!
//! This module provides the crate-wide `Error` enum and `Result` alias.
//! Every failure the codec can produce falls into one of four categories:
//!
//! | Category | Variants | Retryable |
//! |----------|----------|-----------|
//! | **Structural** | `UnknownType`, `UnsupportedFunction`, `MalformedVarint`, `UnknownEnumOrdinal`, `TypeParse` | Never |
//! | **Conversion** | `Conversion`, `Overflow`, `FixedStringTooLong`, `BufferLimit` | Never |
//! | **Stream** | `TruncatedRow` | Never |
//! | **I/O** | `Io` (wrapped with operation context) | Transport decides |
//!
//! ## Design
//!
//! Errors are matchable variants rather than opaque reports so that
//! callers (and tests) can distinguish "this schema names a type we do
//! not implement" from "the server hung up mid-row" without string
//! inspection. Each variant carries enough context to diagnose a failure
//! without looking at raw bytes: the offending type name, the 1-based
//! column index and total column count, or the source and target of a
//! failed conversion.
//!
//! A clean end-of-stream at a row boundary is NOT an error and never
//! produces a variant here; the row reader reports it as exhaustion.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// All failures produced by the RowBinary codec.
#[derive(Debug, Error)]
pub enum Error {
    /// A schema or header names a data type this codec does not know.
    #[error("unknown data type: {0}")]
    UnknownType(String),

    /// An `AggregateFunction` column names a function whose binary state
    /// this codec does not implement. Distinct from `UnknownType`: the
    /// type tag itself was recognized.
    #[error("unsupported aggregate function: {0}")]
    UnsupportedFunction(String),

    /// A length/count prefix was not a valid LEB128 sequence.
    #[error("malformed varint: {0}")]
    MalformedVarint(&'static str),

    /// A decoded enum ordinal has no entry in the column's declared table.
    #[error("ordinal {code} not present in {type_name}")]
    UnknownEnumOrdinal { type_name: String, code: i32 },

    /// A type-descriptor string could not be parsed.
    #[error("invalid type descriptor '{input}' at byte {position}: {reason}")]
    TypeParse {
        input: String,
        position: usize,
        reason: String,
    },

    /// A value cannot be represented as the requested target.
    #[error("cannot convert {from} to {to}")]
    Conversion { from: &'static str, to: String },

    /// A narrowing conversion would lose information.
    #[error("value {value} out of range for {target}")]
    Overflow { value: String, target: &'static str },

    /// Encoding a `FixedString(N)` from more than N bytes.
    #[error("FixedString({declared}) cannot hold {actual} bytes")]
    FixedStringTooLong { declared: usize, actual: usize },

    /// A decoded length prefix exceeds the configured buffer ceiling.
    #[error("length {length} exceeds maximum buffer size {limit}")]
    BufferLimit { length: u64, limit: usize },

    /// End-of-input after a row had started. Clean end-of-input *before*
    /// a row starts is exhaustion, not an error.
    #[error("unexpected end of input reading column #{column} (total {total})")]
    TruncatedRow { column: usize, total: usize },

    /// Name lookup found no column with the given name.
    #[error("no column named '{0}'")]
    NoSuchColumn(String),

    /// Case-insensitive name lookup matched more than one column.
    #[error("column name '{0}' is ambiguous")]
    AmbiguousColumn(String),

    /// Row encode was handed the wrong number of values.
    #[error("row has {actual} values but schema has {expected} columns")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// An underlying byte source/sink failure, wrapped with what the
    /// codec was doing at the time.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wraps an I/O error with operation context (which column, which
    /// direction).
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns true if this error is (or wraps) an unexpected-EOF
    /// condition from the byte source.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == io::ErrorKind::UnexpectedEof)
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::Io {
            context: "i/o error".to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_row_names_column_and_total() {
        let err = Error::TruncatedRow {
            column: 2,
            total: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("column #2"));
        assert!(msg.contains("total 2"));
    }

    #[test]
    fn unexpected_eof_detection() {
        let err = Error::io(
            "reading column 'a'",
            io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        );
        assert!(err.is_unexpected_eof());

        let err = Error::UnknownType("Foo".into());
        assert!(!err.is_unexpected_eof());
    }

    #[test]
    fn unsupported_function_is_not_unknown_type() {
        let err = Error::UnsupportedFunction("anyState".into());
        assert!(err.to_string().contains("anyState"));
        assert!(!matches!(err, Error::UnknownType(_)));
    }
}
