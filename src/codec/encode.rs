//! # Column Encoding
//!
//! The encode-side mirror of the decode match. Values are converted
//! toward the column's declared type through the `as_*` family, so a
//! `Value::Int64` can feed an `Int32` column as long as it fits; a value
//! that does not fit fails with an overflow or conversion error rather
//! than wrapping.
//!
//! A null value under a nullable column writes the marker byte and
//! stops. A null under a non-nullable column encodes the column's
//! default value, matching how short tuples are padded.

use crate::config::CodecConfig;
use crate::encoding::bitmap::write_bitmap;
use crate::encoding::decimal::{rescale, to_i128, DecimalWidth};
use crate::encoding::primitive::*;
use crate::encoding::varint::write_varint;
use crate::error::{Error, Result};
use crate::io::ByteOutput;
use crate::types::{Array, Column, DataType, Value};
use uuid::Uuid;

use super::decode::{NULL_MARKER, VALUE_MARKER};

/// Encodes one column's value to `out`.
pub fn encode_value<O: ByteOutput + ?Sized>(
    value: &Value,
    config: &CodecConfig,
    column: &Column,
    out: &mut O,
) -> Result<()> {
    if column.is_nullable() {
        if value.is_null() {
            return out.write_byte(NULL_MARKER);
        }
        out.write_byte(VALUE_MARKER)?;
    } else if value.is_null() && column.data_type() != DataType::AggregateFunction {
        let default = Value::default_for(column);
        return encode_payload(&default, config, column, out);
    }
    encode_payload(value, config, column, out)
}

fn encode_payload<O: ByteOutput + ?Sized>(
    value: &Value,
    config: &CodecConfig,
    column: &Column,
    out: &mut O,
) -> Result<()> {
    match column.data_type() {
        DataType::Bool => out.write_byte(u8::from(value.as_bool()?)),
        DataType::Int8 => write_i8(value.as_i8()?, out),
        DataType::Int16 => write_i16(value.as_i16()?, out),
        DataType::Int32 => write_i32(value.as_i32()?, out),
        DataType::Int64 => write_i64(value.as_i64()?, out),
        DataType::Int128 => match value {
            Value::Int128(v) => write_i128(*v, out),
            other => write_i128(i128::from(other.as_i64()?), out),
        },
        DataType::UInt8 => write_u8(value.as_u8()?, out),
        DataType::UInt16 => write_u16(value.as_u16()?, out),
        DataType::UInt32 => write_u32(value.as_u32()?, out),
        DataType::UInt64 => write_u64(value.as_u64()?, out),
        DataType::UInt128 => match value {
            Value::UInt128(v) => write_u128(*v, out),
            other => write_u128(u128::from(other.as_u64()?), out),
        },
        DataType::Int256 => write_i256(&value.as_big_integer()?, out),
        DataType::UInt256 => write_u256(&value.as_big_integer()?, out),
        DataType::Float32 => write_f32(value.as_f64()? as f32, out),
        DataType::Float64 => write_f64(value.as_f64()?, out),
        DataType::Decimal
        | DataType::Decimal32
        | DataType::Decimal64
        | DataType::Decimal128
        | DataType::Decimal256 => encode_decimal(value, column, out),
        DataType::Date => write_u16(epoch_days(value)?.try_into().map_err(|_| overflow(value, "Date"))?, out),
        DataType::Date32 => write_i32(epoch_days(value)?.try_into().map_err(|_| overflow(value, "Date32"))?, out),
        DataType::DateTime | DataType::DateTime32 => {
            write_u32(epoch_seconds(value)?.try_into().map_err(|_| overflow(value, "DateTime"))?, out)
        }
        DataType::DateTime64 => encode_datetime64(value, column, out),
        DataType::Enum8 => {
            let code = enum_code(value, column)?;
            write_i8(i8::try_from(code).map_err(|_| overflow(value, "Enum8"))?, out)
        }
        DataType::Enum16 => {
            let code = enum_code(value, column)?;
            write_i16(i16::try_from(code).map_err(|_| overflow(value, "Enum16"))?, out)
        }
        DataType::String => {
            let rendered;
            let bytes = match value {
                Value::String(bytes) | Value::FixedString(bytes) => bytes.as_slice(),
                other => {
                    rendered = other.as_string();
                    rendered.as_bytes()
                }
            };
            write_varint(bytes.len() as u64, out)?;
            out.write_bytes(bytes)
        }
        DataType::FixedString => {
            let declared = column.fixed_length().unwrap_or(0);
            let bytes = value.as_bytes()?;
            if bytes.len() > declared {
                return Err(Error::FixedStringTooLong {
                    declared,
                    actual: bytes.len(),
                });
            }
            out.write_bytes(bytes)?;
            for _ in bytes.len()..declared {
                out.write_byte(0)?;
            }
            Ok(())
        }
        DataType::Uuid => {
            let uuid = match value {
                Value::Uuid(uuid) => *uuid,
                Value::String(bytes) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| conversion(value, "UUID"))?,
                other => return Err(conversion(other, "UUID")),
            };
            let (hi, lo) = uuid.as_u64_pair();
            write_u64(hi, out)?;
            write_u64(lo, out)
        }
        DataType::Ipv4 => match value {
            Value::Ipv4(addr) => out.write_bytes(&addr.octets()),
            Value::String(bytes) => {
                let addr: std::net::Ipv4Addr = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| conversion(value, "IPv4"))?;
                out.write_bytes(&addr.octets())
            }
            other => Err(conversion(other, "IPv4")),
        },
        DataType::Ipv6 => match value {
            Value::Ipv6(addr) => out.write_bytes(&addr.octets()),
            Value::String(bytes) => {
                let addr: std::net::Ipv6Addr = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| conversion(value, "IPv6"))?;
                out.write_bytes(&addr.octets())
            }
            other => Err(conversion(other, "IPv6")),
        },
        DataType::Array => encode_array(value, config, column, out),
        DataType::Map => {
            let pairs = value.as_map()?;
            let key_col = column.child(0)?;
            let value_col = column.child(1)?;
            write_varint(pairs.len() as u64, out)?;
            for (key, val) in pairs {
                encode_value(key, config, key_col, out)?;
                encode_value(val, config, value_col, out)?;
            }
            Ok(())
        }
        DataType::Tuple => {
            let fields = value.as_tuple()?;
            let children = column.children();
            if fields.len() > children.len() {
                return Err(Error::ColumnCountMismatch {
                    expected: children.len(),
                    actual: fields.len(),
                });
            }
            for (idx, child) in children.iter().enumerate() {
                match fields.get(idx) {
                    Some(field) => encode_value(field, config, child, out)?,
                    // A shorter supplied tuple is padded with each
                    // field's own default.
                    None => encode_value(&Value::default_for(child), config, child, out)?,
                }
            }
            Ok(())
        }
        DataType::Nested => {
            let children_values = match value {
                Value::Nested(children) => children,
                other => return Err(conversion(other, "Nested")),
            };
            let children = column.children();
            if children_values.len() != children.len() {
                return Err(Error::ColumnCountMismatch {
                    expected: children.len(),
                    actual: children_values.len(),
                });
            }
            for (child, elements) in children.iter().zip(children_values) {
                write_varint(elements.len() as u64, out)?;
                for element in elements {
                    encode_value(element, config, child, out)?;
                }
            }
            Ok(())
        }
        DataType::Point => match value {
            Value::Point(x, y) => {
                write_f64(*x, out)?;
                write_f64(*y, out)
            }
            Value::Tuple(fields) if fields.len() == 2 => {
                write_f64(fields[0].as_f64()?, out)?;
                write_f64(fields[1].as_f64()?, out)
            }
            other => Err(conversion(other, "Point")),
        },
        DataType::Ring | DataType::Polygon | DataType::MultiPolygon => {
            encode_geo(value, config, column.data_type(), out)
        }
        DataType::AggregateFunction => encode_aggregate(value, column, out),
    }
}

fn conversion(value: &Value, to: &str) -> Error {
    Error::Conversion {
        from: value.type_name(),
        to: to.to_string(),
    }
}

fn overflow(value: &Value, target: &'static str) -> Error {
    Error::Overflow {
        value: value.as_string(),
        target,
    }
}

fn epoch_days(value: &Value) -> Result<i64> {
    match value {
        Value::Date { days, .. } => Ok(i64::from(*days)),
        Value::Date32 { days, .. } => Ok(i64::from(*days)),
        Value::DateTime { .. } | Value::DateTime64 { .. } => {
            let epoch = chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0)
                .ok_or_else(|| conversion(value, "Date"))?
                .date_naive();
            Ok((value.as_date()? - epoch).num_days())
        }
        other => other.as_i64(),
    }
}

fn epoch_seconds(value: &Value) -> Result<i64> {
    match value {
        Value::DateTime { seconds, .. } => Ok(i64::from(*seconds)),
        Value::DateTime64 { .. } => Ok(value.as_datetime()?.timestamp()),
        Value::Date { days, .. } => Ok(i64::from(*days) * 86_400),
        Value::Date32 { days, .. } => Ok(i64::from(*days) * 86_400),
        other => other.as_i64(),
    }
}

fn encode_datetime64<O: ByteOutput + ?Sized>(
    value: &Value,
    column: &Column,
    out: &mut O,
) -> Result<()> {
    let target_scale = column.scale().unwrap_or(3);
    let scaled = match value {
        Value::DateTime64 { value: raw, scale, .. } => {
            rescale_i64(*raw, *scale, target_scale).ok_or_else(|| overflow(value, "DateTime64"))?
        }
        other => {
            let seconds = epoch_seconds(other)?;
            seconds
                .checked_mul(10i64.pow(target_scale))
                .ok_or_else(|| overflow(value, "DateTime64"))?
        }
    };
    write_i64(scaled, out)
}

/// Exact fixed-point rescale; scaling down truncates nothing, it fails.
fn rescale_i64(value: i64, from: u32, to: u32) -> Option<i64> {
    use std::cmp::Ordering;
    match from.cmp(&to) {
        Ordering::Equal => Some(value),
        Ordering::Less => value.checked_mul(10i64.pow(to - from)),
        Ordering::Greater => {
            let divisor = 10i64.pow(from - to);
            (value % divisor == 0).then(|| value / divisor)
        }
    }
}

fn enum_code(value: &Value, column: &Column) -> Result<i32> {
    let table = column.enum_table().ok_or_else(|| Error::TypeParse {
        input: column.type_string(),
        position: 0,
        reason: "enum column without a declared table".to_string(),
    })?;
    let code = match value {
        Value::Enum { code, .. } => *code,
        Value::String(bytes) => {
            let name = std::str::from_utf8(bytes).map_err(|_| conversion(value, "Enum"))?;
            return table.code_of(name).ok_or_else(|| Error::Conversion {
                from: "String",
                to: format!("{} (no entry '{name}')", column.type_string()),
            });
        }
        other => other.as_i32()?,
    };
    if table.name_of(code).is_none() {
        return Err(Error::UnknownEnumOrdinal {
            type_name: column.type_string(),
            code,
        });
    }
    Ok(code)
}

fn encode_decimal<O: ByteOutput + ?Sized>(
    value: &Value,
    column: &Column,
    out: &mut O,
) -> Result<()> {
    let target_scale = column.scale().unwrap_or(0);
    let width = match column.data_type() {
        DataType::Decimal32 => DecimalWidth::W32,
        DataType::Decimal64 => DecimalWidth::W64,
        DataType::Decimal128 => DecimalWidth::W128,
        DataType::Decimal256 => DecimalWidth::W256,
        _ => DecimalWidth::from_precision(column.precision().unwrap_or(10)),
    };
    let (digits, scale) = value.as_big_decimal()?;
    let digits = rescale(&digits, scale, target_scale)?;
    match width {
        DecimalWidth::W32 => {
            let narrow = to_i128(&digits, "Decimal32")?;
            write_i32(
                i32::try_from(narrow).map_err(|_| overflow(value, "Decimal32"))?,
                out,
            )
        }
        DecimalWidth::W64 => {
            let narrow = to_i128(&digits, "Decimal64")?;
            write_i64(
                i64::try_from(narrow).map_err(|_| overflow(value, "Decimal64"))?,
                out,
            )
        }
        DecimalWidth::W128 => write_i128(to_i128(&digits, "Decimal128")?, out),
        DecimalWidth::W256 => write_i256(&digits, out),
    }
}

fn encode_array<O: ByteOutput + ?Sized>(
    value: &Value,
    config: &CodecConfig,
    column: &Column,
    out: &mut O,
) -> Result<()> {
    let array = match value {
        Value::Array(array) => array,
        other => return Err(conversion(other, "Array")),
    };
    write_varint(array.len() as u64, out)?;

    // Flat storage that matches the declared base type streams straight
    // through without boxing.
    let element_col = column.child(0)?;
    let flat_ok = column.array_depth() == 1 && !element_col.is_nullable();
    match (flat_ok.then(|| column.array_base()).flatten(), array) {
        (Some(DataType::Int8), Array::Int8(v)) => {
            for item in v {
                write_i8(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::Int16), Array::Int16(v)) => {
            for item in v {
                write_i16(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::Int32), Array::Int32(v)) => {
            for item in v {
                write_i32(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::Int64), Array::Int64(v)) => {
            for item in v {
                write_i64(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::UInt8), Array::UInt8(v)) => out.write_bytes(v),
        (Some(DataType::UInt16), Array::UInt16(v)) => {
            for item in v {
                write_u16(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::UInt32), Array::UInt32(v)) => {
            for item in v {
                write_u32(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::UInt64), Array::UInt64(v)) => {
            for item in v {
                write_u64(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::Float32), Array::Float32(v)) => {
            for item in v {
                write_f32(*item, out)?;
            }
            Ok(())
        }
        (Some(DataType::Float64), Array::Float64(v)) => {
            for item in v {
                write_f64(*item, out)?;
            }
            Ok(())
        }
        _ => {
            for idx in 0..array.len() {
                let element = array.value_at(idx).ok_or_else(|| conversion(value, "Array"))?;
                encode_value(&element, config, element_col, out)?;
            }
            Ok(())
        }
    }
}

fn encode_geo<O: ByteOutput + ?Sized>(
    value: &Value,
    config: &CodecConfig,
    data_type: DataType,
    out: &mut O,
) -> Result<()> {
    let element = match data_type {
        DataType::Ring => DataType::Point,
        DataType::Polygon => DataType::Ring,
        DataType::MultiPolygon => DataType::Polygon,
        other => return Err(Error::UnknownType(other.name().to_string())),
    };
    let element_col = Column::new("", element);
    let elements = value.as_array()?;
    write_varint(elements.len() as u64, out)?;
    for item in &elements {
        encode_payload(item, config, &element_col, out)?;
    }
    Ok(())
}

fn encode_aggregate<O: ByteOutput + ?Sized>(
    value: &Value,
    column: &Column,
    out: &mut O,
) -> Result<()> {
    let function = column.function().unwrap_or("");
    if !function.eq_ignore_ascii_case("groupBitmap") {
        return Err(Error::UnsupportedFunction(function.to_string()));
    }
    let base = column.child(0)?.data_type();
    match value {
        Value::Bitmap(bitmap) => write_bitmap(bitmap, base, out),
        // A null aggregate state encodes as the empty set.
        Value::Null => {
            let empty = crate::encoding::bitmap::Bitmap::for_base(base)?;
            write_bitmap(&empty, base, out)
        }
        other => Err(conversion(other, "AggregateFunction")),
    }
}
