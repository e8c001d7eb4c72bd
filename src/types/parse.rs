//! # Type-Descriptor Parsing
//!
//! Parses the type-descriptor strings a schema header (or caller)
//! supplies into [`Column`] trees: `Nullable(Array(Int32))`,
//! `Decimal(19, 15)`, `Enum8('a' = 1, 'b' = 2)`,
//! `DateTime64(3, 'Asia/Tokyo')`, `Nested(id UInt32, tag String)`.
//!
//! ## Grammar
//!
//! ```text
//! type    := ident [ '(' args ')' ]
//! args    := type-specific (numbers, quoted strings, nested types,
//!            named fields, 'name' = code pairs)
//! ```
//!
//! Single-pass recursive descent over a byte cursor; type names match
//! case-insensitively. Errors carry the byte position of the failure.
//!
//! ## Transparent wrappers
//!
//! `LowCardinality(T)` and `SimpleAggregateFunction(f, T)` change the
//! server's storage, not the RowBinary framing, so both unwrap to `T`.
//! `Nullable` of a composite type is rejected here, mirroring the
//! constructor invariant.

use super::{Column, DataType};
use crate::error::{Error, Result};

/// Parses one complete type descriptor. Trailing input is an error.
pub fn parse_descriptor(input: &str) -> Result<Column> {
    let mut parser = Parser::new(input);
    let column = parser.parse_type()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("trailing characters after type"));
    }
    Ok(column)
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::TypeParse {
            input: self.input.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        self.skip_ws();
        match self.bump() {
            Some(byte) if byte == expected => Ok(()),
            _ => {
                self.pos = self.pos.saturating_sub(1);
                Err(self.error(format!("expected '{}'", expected as char)))
            }
        }
    }

    fn eat(&mut self, expected: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn read_ident(&mut self) -> Result<&'a str> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'_') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected identifier"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn read_number(&mut self) -> Result<i64> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start || &self.input[start..self.pos] == "-" {
            return Err(self.error("expected number"));
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| self.error("number out of range"))
    }

    fn read_quoted(&mut self) -> Result<String> {
        self.skip_ws();
        if self.bump() != Some(b'\'') {
            self.pos = self.pos.saturating_sub(1);
            return Err(self.error("expected quoted string"));
        }
        // Bytes are collected raw so multibyte UTF-8 labels survive, then
        // validated once at the closing quote.
        let start = self.pos;
        let mut out = Vec::new();
        loop {
            match self.bump() {
                Some(b'\'') => {
                    return String::from_utf8(out).map_err(|_| Error::TypeParse {
                        input: self.input.to_string(),
                        position: start,
                        reason: "invalid UTF-8 in quoted string".to_string(),
                    })
                }
                Some(b'\\') => match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(byte) => out.push(byte),
                None => return Err(self.error("unterminated quoted string")),
            }
        }
    }

    fn parse_type(&mut self) -> Result<Column> {
        let name = self.read_ident()?;
        match name.to_ascii_lowercase().as_str() {
            "nullable" => {
                self.expect(b'(')?;
                let inner = self.parse_type()?;
                self.expect(b')')?;
                if !inner.data_type().can_be_null() {
                    return Err(self.error("composite types cannot be Nullable"));
                }
                inner.nullable()
            }
            // Storage-only wrapper: the RowBinary framing is the inner
            // type's framing.
            "lowcardinality" => {
                self.expect(b'(')?;
                let inner = self.parse_type()?;
                self.expect(b')')?;
                Ok(inner)
            }
            // Serialized as the plain underlying type.
            "simpleaggregatefunction" => {
                self.expect(b'(')?;
                self.read_ident()?;
                self.expect(b',')?;
                let inner = self.parse_type()?;
                self.expect(b')')?;
                Ok(inner)
            }
            "aggregatefunction" => {
                self.expect(b'(')?;
                let function = self.read_ident()?.to_string();
                self.expect(b',')?;
                let inner = self.parse_type()?;
                self.expect(b')')?;
                Ok(Column::aggregate_function("", function, inner))
            }
            _ => {
                let data_type = DataType::from_name(name)
                    .map_err(|_| self.error(format!("unknown data type: {name}")))?;
                self.parse_args(data_type)
            }
        }
    }

    fn parse_args(&mut self, data_type: DataType) -> Result<Column> {
        match data_type {
            DataType::Decimal => {
                self.expect(b'(')?;
                let precision = self.read_number()?;
                self.expect(b',')?;
                let scale = self.read_number()?;
                self.expect(b')')?;
                if precision <= 0 || precision > 76 || scale < 0 || scale > precision {
                    return Err(self.error("invalid decimal precision/scale"));
                }
                Ok(Column::decimal("", precision as u32, scale as u32))
            }
            DataType::Decimal32 | DataType::Decimal64 | DataType::Decimal128
            | DataType::Decimal256 => {
                self.expect(b'(')?;
                let scale = self.read_number()?;
                self.expect(b')')?;
                if scale < 0 {
                    return Err(self.error("negative decimal scale"));
                }
                Ok(Column::decimal_sized("", data_type, scale as u32))
            }
            DataType::FixedString => {
                self.expect(b'(')?;
                let length = self.read_number()?;
                self.expect(b')')?;
                if length <= 0 {
                    return Err(self.error("FixedString length must be positive"));
                }
                Ok(Column::fixed_string("", length as usize))
            }
            DataType::DateTime | DataType::DateTime32 => {
                let mut col = Column::new("", data_type);
                if self.eat(b'(') {
                    let zone = self.read_quoted()?;
                    self.expect(b')')?;
                    col.set_timezone(Some(self.parse_zone(&zone)?));
                }
                Ok(col)
            }
            DataType::DateTime64 => {
                let mut scale = 3;
                let mut zone = None;
                if self.eat(b'(') {
                    scale = self.read_number()?;
                    if scale < 0 || scale > 9 {
                        return Err(self.error("DateTime64 scale must be 0..=9"));
                    }
                    if self.eat(b',') {
                        let name = self.read_quoted()?;
                        zone = Some(self.parse_zone(&name)?);
                    }
                    self.expect(b')')?;
                }
                Ok(Column::datetime64("", scale as u32, zone))
            }
            DataType::Enum8 | DataType::Enum16 => {
                self.expect(b'(')?;
                let mut entries = Vec::new();
                loop {
                    let label = self.read_quoted()?;
                    self.expect(b'=')?;
                    let code = self.read_number()?;
                    let (min, max) = if data_type == DataType::Enum8 {
                        (i8::MIN as i64, i8::MAX as i64)
                    } else {
                        (i16::MIN as i64, i16::MAX as i64)
                    };
                    if code < min || code > max {
                        return Err(self.error("enum ordinal out of range"));
                    }
                    entries.push((label, code as i32));
                    if !self.eat(b',') {
                        break;
                    }
                }
                self.expect(b')')?;
                Ok(if data_type == DataType::Enum8 {
                    Column::enum8("", entries)
                } else {
                    Column::enum16("", entries)
                })
            }
            DataType::Array => {
                self.expect(b'(')?;
                let element = self.parse_type()?;
                self.expect(b')')?;
                Ok(Column::array("", element))
            }
            DataType::Map => {
                self.expect(b'(')?;
                let key = self.parse_type()?;
                self.expect(b',')?;
                let value = self.parse_type()?;
                self.expect(b')')?;
                Ok(Column::map("", key, value))
            }
            DataType::Tuple => {
                self.expect(b'(')?;
                let mut fields = Vec::new();
                loop {
                    fields.push(self.parse_field(false)?);
                    if !self.eat(b',') {
                        break;
                    }
                }
                self.expect(b')')?;
                Ok(Column::tuple("", fields))
            }
            DataType::Nested => {
                self.expect(b'(')?;
                let mut children = Vec::new();
                loop {
                    children.push(self.parse_field(true)?);
                    if !self.eat(b',') {
                        break;
                    }
                }
                self.expect(b')')?;
                Ok(Column::nested("", children))
            }
            _ => Ok(Column::new("", data_type)),
        }
    }

    /// Parses a tuple/nested member, which may be `Type` or `name Type`.
    fn parse_field(&mut self, name_required: bool) -> Result<Column> {
        self.skip_ws();
        let start = self.pos;
        let ident = self.read_ident()?;
        self.skip_ws();
        // A second identifier means the first one was the field name.
        let named = matches!(self.peek(), Some(b) if b.is_ascii_alphabetic() || b == b'_');
        if named {
            let field_name = ident.to_string();
            let column = self.parse_type()?;
            Ok(column.with_name(field_name))
        } else {
            if name_required {
                return Err(self.error("Nested children must be named"));
            }
            self.pos = start;
            self.parse_type()
        }
    }

    fn parse_zone(&mut self, name: &str) -> Result<chrono_tz::Tz> {
        name.parse()
            .map_err(|_| self.error(format!("unknown time zone: {name}")))
    }
}
