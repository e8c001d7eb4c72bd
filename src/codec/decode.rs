//! # Column Decoding
//!
//! One exhaustive match over [`DataType`] drives every decode. Adding a
//! variant to the tag enum breaks this match at compile time, so type
//! coverage is checked by the compiler rather than by a registry lookup.
//!
//! Decoding writes into a caller-owned `Value` slot. When the slot
//! already holds a compatible allocation (a string buffer, a flat array
//! vector) the decoder takes it back and refills it, which is what makes
//! the row reader's reuse policy allocation-free in the steady state.
//!
//! Nullability is handled here and only here: a nullable column reads
//! one marker byte first, and a set marker resets the slot without
//! consuming payload bytes. Composite columns never carry their own
//! marker; only their leaf members do.

use crate::config::CodecConfig;
use crate::encoding::bitmap::read_bitmap;
use crate::encoding::decimal::DecimalWidth;
use crate::encoding::primitive::*;
use crate::encoding::varint::read_varint;
use crate::error::{Error, Result};
use crate::io::ByteInput;
use crate::types::{Array, Column, DataType, Value};
use chrono_tz::Tz;
use std::mem;
use uuid::Uuid;

/// Marker byte for a null cell under a nullable column.
pub(crate) const NULL_MARKER: u8 = 1;
/// Marker byte preceding a concrete value under a nullable column.
pub(crate) const VALUE_MARKER: u8 = 0;

/// Decodes one column's value from `input` into `slot`.
pub fn decode_value<I: ByteInput + ?Sized>(
    slot: &mut Value,
    config: &CodecConfig,
    column: &Column,
    input: &mut I,
) -> Result<()> {
    if column.is_nullable() && input.read_byte()? != VALUE_MARKER {
        slot.reset();
        return Ok(());
    }
    decode_payload(slot, config, column, input)
}

fn decode_payload<I: ByteInput + ?Sized>(
    slot: &mut Value,
    config: &CodecConfig,
    column: &Column,
    input: &mut I,
) -> Result<()> {
    *slot = match column.data_type() {
        DataType::Bool => Value::Bool(input.read_byte()? != 0),
        DataType::Int8 => Value::Int8(read_i8(input)?),
        DataType::Int16 => Value::Int16(read_i16(input)?),
        DataType::Int32 => Value::Int32(read_i32(input)?),
        DataType::Int64 => Value::Int64(read_i64(input)?),
        DataType::Int128 => Value::Int128(read_i128(input)?),
        DataType::Int256 => Value::BigInt(read_i256(input)?),
        DataType::UInt8 => Value::UInt8(read_u8(input)?),
        DataType::UInt16 => Value::UInt16(read_u16(input)?),
        DataType::UInt32 => Value::UInt32(read_u32(input)?),
        DataType::UInt64 => Value::UInt64(read_u64(input)?),
        DataType::UInt128 => Value::UInt128(read_u128(input)?),
        DataType::UInt256 => Value::BigInt(read_u256(input)?),
        DataType::Float32 => Value::Float32(read_f32(input)?),
        DataType::Float64 => Value::Float64(read_f64(input)?),
        DataType::Decimal
        | DataType::Decimal32
        | DataType::Decimal64
        | DataType::Decimal128
        | DataType::Decimal256 => decode_decimal(column, input)?,
        DataType::Date => Value::Date {
            days: read_u16(input)?,
            tz: config.date_timezone,
        },
        DataType::Date32 => Value::Date32 {
            days: read_i32(input)?,
            tz: config.date_timezone,
        },
        DataType::DateTime | DataType::DateTime32 => Value::DateTime {
            seconds: read_u32(input)?,
            tz: zone_of(column, config),
        },
        DataType::DateTime64 => Value::DateTime64 {
            value: read_i64(input)?,
            scale: column.scale().unwrap_or(3),
            tz: zone_of(column, config),
        },
        DataType::Enum8 => decode_enum(column, i32::from(read_i8(input)?))?,
        DataType::Enum16 => decode_enum(column, i32::from(read_i16(input)?))?,
        DataType::String => {
            let length = config.check_length(read_varint(input)?)?;
            let mut buf = match mem::replace(slot, Value::Null) {
                Value::String(buf) => buf,
                _ => Vec::new(),
            };
            buf.clear();
            buf.resize(length, 0);
            input.read_bytes(&mut buf)?;
            Value::String(buf)
        }
        DataType::FixedString => {
            let length = column.fixed_length().unwrap_or(0);
            let mut buf = vec![0u8; length];
            input.read_bytes(&mut buf)?;
            Value::FixedString(buf)
        }
        DataType::Uuid => {
            let hi = read_u64(input)?;
            let lo = read_u64(input)?;
            Value::Uuid(Uuid::from_u64_pair(hi, lo))
        }
        DataType::Ipv4 => {
            let mut octets = [0u8; 4];
            input.read_bytes(&mut octets)?;
            Value::Ipv4(octets.into())
        }
        DataType::Ipv6 => {
            let mut octets = [0u8; 16];
            input.read_bytes(&mut octets)?;
            Value::Ipv6(octets.into())
        }
        DataType::Array => decode_array(slot, config, column, input)?,
        DataType::Map => {
            let pairs = config.check_length(read_varint(input)?)?;
            let key_col = column.child(0)?;
            let value_col = column.child(1)?;
            let mut entries = Vec::with_capacity(pairs);
            for _ in 0..pairs {
                let mut key = Value::Null;
                let mut value = Value::Null;
                decode_value(&mut key, config, key_col, input)?;
                decode_value(&mut value, config, value_col, input)?;
                entries.push((key, value));
            }
            Value::Map(entries)
        }
        DataType::Tuple => {
            let mut fields = Vec::with_capacity(column.children().len());
            for child in column.children() {
                let mut field = Value::Null;
                decode_value(&mut field, config, child, input)?;
                fields.push(field);
            }
            Value::Tuple(fields)
        }
        DataType::Nested => {
            let mut children = Vec::with_capacity(column.children().len());
            for child in column.children() {
                let count = config.check_length(read_varint(input)?)?;
                let mut elements = Vec::with_capacity(count);
                for _ in 0..count {
                    let mut element = Value::Null;
                    decode_value(&mut element, config, child, input)?;
                    elements.push(element);
                }
                children.push(elements);
            }
            Value::Nested(children)
        }
        DataType::Point => Value::Point(read_f64(input)?, read_f64(input)?),
        DataType::Ring | DataType::Polygon | DataType::MultiPolygon => {
            decode_geo(config, column.data_type(), input)?
        }
        DataType::AggregateFunction => decode_aggregate(config, column, input)?,
    };
    Ok(())
}

fn zone_of(column: &Column, config: &CodecConfig) -> Tz {
    column.timezone().unwrap_or(config.timezone)
}

fn decode_decimal<I: ByteInput + ?Sized>(column: &Column, input: &mut I) -> Result<Value> {
    let scale = column.scale().unwrap_or(0);
    let width = match column.data_type() {
        DataType::Decimal32 => DecimalWidth::W32,
        DataType::Decimal64 => DecimalWidth::W64,
        DataType::Decimal128 => DecimalWidth::W128,
        DataType::Decimal256 => DecimalWidth::W256,
        _ => DecimalWidth::from_precision(column.precision().unwrap_or(10)),
    };
    Ok(match width {
        DecimalWidth::W32 => Value::Decimal {
            digits: i128::from(read_i32(input)?),
            scale,
        },
        DecimalWidth::W64 => Value::Decimal {
            digits: i128::from(read_i64(input)?),
            scale,
        },
        DecimalWidth::W128 => Value::Decimal {
            digits: read_i128(input)?,
            scale,
        },
        DecimalWidth::W256 => Value::BigDecimal {
            digits: read_i256(input)?,
            scale,
        },
    })
}

fn decode_enum(column: &Column, code: i32) -> Result<Value> {
    let name = column
        .enum_table()
        .and_then(|table| table.name_of(code))
        .ok_or_else(|| Error::UnknownEnumOrdinal {
            type_name: column.type_string(),
            code,
        })?;
    Ok(Value::Enum {
        code,
        name: name.to_string(),
    })
}

/// Depth-1 arrays of plain numerics fill flat vectors without boxing
/// each element; everything else recurses per element.
fn decode_array<I: ByteInput + ?Sized>(
    slot: &mut Value,
    config: &CodecConfig,
    column: &Column,
    input: &mut I,
) -> Result<Value> {
    let count = config.check_length(read_varint(input)?)?;
    let element_col = column.child(0)?;

    let flat_base = (column.array_depth() == 1 && !element_col.is_nullable())
        .then(|| column.array_base())
        .flatten()
        .filter(|base| base.is_flat_numeric());

    if let Some(base) = flat_base {
        return decode_flat_array(slot, base, count, input);
    }

    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let mut element = Value::Null;
        decode_value(&mut element, config, element_col, input)?;
        elements.push(element);
    }
    Ok(Value::Array(Array::Boxed(elements)))
}

macro_rules! fill_flat {
    ($slot:expr, $variant:ident, $read:ident, $count:expr, $input:expr) => {{
        let mut vec = match mem::replace($slot, Value::Null) {
            Value::Array(Array::$variant(mut v)) => {
                v.clear();
                v
            }
            _ => Vec::with_capacity($count),
        };
        for _ in 0..$count {
            vec.push($read($input)?);
        }
        Value::Array(Array::$variant(vec))
    }};
}

fn decode_flat_array<I: ByteInput + ?Sized>(
    slot: &mut Value,
    base: DataType,
    count: usize,
    input: &mut I,
) -> Result<Value> {
    Ok(match base {
        DataType::Int8 => fill_flat!(slot, Int8, read_i8, count, input),
        DataType::Int16 => fill_flat!(slot, Int16, read_i16, count, input),
        DataType::Int32 => fill_flat!(slot, Int32, read_i32, count, input),
        DataType::Int64 => fill_flat!(slot, Int64, read_i64, count, input),
        DataType::UInt8 => fill_flat!(slot, UInt8, read_u8, count, input),
        DataType::UInt16 => fill_flat!(slot, UInt16, read_u16, count, input),
        DataType::UInt32 => fill_flat!(slot, UInt32, read_u32, count, input),
        DataType::UInt64 => fill_flat!(slot, UInt64, read_u64, count, input),
        DataType::Float32 => fill_flat!(slot, Float32, read_f32, count, input),
        DataType::Float64 => fill_flat!(slot, Float64, read_f64, count, input),
        other => return Err(Error::UnknownType(format!("flat array of {}", other.name()))),
    })
}

/// Geo types are fixed compositions over the 2-float point, decoded as
/// arrays at each nesting level.
fn decode_geo<I: ByteInput + ?Sized>(
    config: &CodecConfig,
    data_type: DataType,
    input: &mut I,
) -> Result<Value> {
    let element = match data_type {
        DataType::Ring => DataType::Point,
        DataType::Polygon => DataType::Ring,
        DataType::MultiPolygon => DataType::Polygon,
        other => return Err(Error::UnknownType(other.name().to_string())),
    };
    let element_col = Column::new("", element);
    let count = config.check_length(read_varint(input)?)?;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let mut value = Value::Null;
        decode_payload(&mut value, config, &element_col, input)?;
        elements.push(value);
    }
    Ok(Value::Array(Array::Boxed(elements)))
}

fn decode_aggregate<I: ByteInput + ?Sized>(
    config: &CodecConfig,
    column: &Column,
    input: &mut I,
) -> Result<Value> {
    let function = column.function().unwrap_or("");
    if !function.eq_ignore_ascii_case("groupBitmap") {
        return Err(Error::UnsupportedFunction(function.to_string()));
    }
    let base = column.child(0)?.data_type();
    Ok(Value::Bitmap(read_bitmap(input, base, config)?))
}
