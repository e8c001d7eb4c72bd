//! # Typed Value Model
//!
//! One [`Value`] holds one cell's content for one row. A value is always
//! in exactly one of two states, null-or-empty (`Value::Null`) or holding
//! a concrete value of its declared type, and the two are never conflated:
//! resetting a slot and decoding a null both land on `Value::Null`.
//!
//! ## Conversions
//!
//! The `as_*` family provides many-to-many conversions between
//! representations. Narrowing follows one policy throughout:
//!
//! - floating to integral truncates toward zero, then range-checks
//! - integral to narrower integral fails on overflow, never wraps
//! - `UInt64` content above `i64::MAX` fails `as_i64` rather than
//!   reinterpreting the sign bit
//! - decimal conversions stay in scaled-integer space; no path through
//!   floating point except `as_f64` itself
//!
//! ## Updates and reuse
//!
//! `update_array` rebuilds an array slot from another container. Lists
//! and tuples copy positionally; maps copy by key ordinal, where the
//! expected ordinal of the entry at insertion position `i` is `i + 1`.
//! A source that is not a container, or a map key that does not match
//! its ordinal, fails with a conversion error rather than substituting a
//! default. Element types are validated against the column descriptor at
//! encode time.
//!
//! `Clone` is a deep copy; a cloned value shares no backing storage with
//! the original, so rows handed out under the reuse policy survive the
//! next read once cloned.

use crate::encoding::bitmap::Bitmap;
use crate::encoding::decimal::{format_big_decimal, format_decimal};
use crate::error::{Error, Result};
use chrono::{DateTime as ChronoDateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use num_bigint::BigInt;
use std::net::{Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

use super::{Column, DataType};

/// Flat backing storage for depth-1 arrays of plain numeric scalars.
///
/// The decoder fills these without boxing each element; everything else
/// lands in `Boxed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Array {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Boxed(Vec<Value>),
}

impl Array {
    /// Empty flat storage for a plain numeric base type, `None` when the
    /// base type has no flat representation.
    pub fn flat_for(base: DataType) -> Option<Array> {
        Some(match base {
            DataType::Int8 => Array::Int8(Vec::new()),
            DataType::Int16 => Array::Int16(Vec::new()),
            DataType::Int32 => Array::Int32(Vec::new()),
            DataType::Int64 => Array::Int64(Vec::new()),
            DataType::UInt8 => Array::UInt8(Vec::new()),
            DataType::UInt16 => Array::UInt16(Vec::new()),
            DataType::UInt32 => Array::UInt32(Vec::new()),
            DataType::UInt64 => Array::UInt64(Vec::new()),
            DataType::Float32 => Array::Float32(Vec::new()),
            DataType::Float64 => Array::Float64(Vec::new()),
            _ => return None,
        })
    }

    pub fn len(&self) -> usize {
        match self {
            Array::Int8(v) => v.len(),
            Array::Int16(v) => v.len(),
            Array::Int32(v) => v.len(),
            Array::Int64(v) => v.len(),
            Array::UInt8(v) => v.len(),
            Array::UInt16(v) => v.len(),
            Array::UInt32(v) => v.len(),
            Array::UInt64(v) => v.len(),
            Array::Float32(v) => v.len(),
            Array::Float64(v) => v.len(),
            Array::Boxed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `idx`, boxed as a [`Value`].
    pub fn value_at(&self, idx: usize) -> Option<Value> {
        if idx >= self.len() {
            return None;
        }
        Some(match self {
            Array::Int8(v) => Value::Int8(v[idx]),
            Array::Int16(v) => Value::Int16(v[idx]),
            Array::Int32(v) => Value::Int32(v[idx]),
            Array::Int64(v) => Value::Int64(v[idx]),
            Array::UInt8(v) => Value::UInt8(v[idx]),
            Array::UInt16(v) => Value::UInt16(v[idx]),
            Array::UInt32(v) => Value::UInt32(v[idx]),
            Array::UInt64(v) => Value::UInt64(v[idx]),
            Array::Float32(v) => Value::Float32(v[idx]),
            Array::Float64(v) => Value::Float64(v[idx]),
            Array::Boxed(v) => v[idx].clone(),
        })
    }

    /// All elements, boxed.
    pub fn to_values(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.value_at(i)).collect()
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Array::Boxed(values)
    }
}

/// The in-memory representation of one cell.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null-or-empty state.
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int128(i128),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    UInt128(u128),
    /// 256-bit signed or unsigned integer content.
    BigInt(BigInt),
    Float32(f32),
    Float64(f64),
    /// Scaled-integer decimal: the numeric value is `digits / 10^scale`.
    Decimal { digits: i128, scale: u32 },
    /// 256-bit decimal content.
    BigDecimal { digits: BigInt, scale: u32 },
    /// Raw bytes; UTF-8 assumed but not validated at this layer.
    String(Vec<u8>),
    FixedString(Vec<u8>),
    /// Days since the epoch, unsigned, plus resolved zone.
    Date { days: u16, tz: Tz },
    /// Days since the epoch, signed, plus resolved zone.
    Date32 { days: i32, tz: Tz },
    /// Epoch seconds plus resolved zone.
    DateTime { seconds: u32, tz: Tz },
    /// Fixed-point epoch value scaled by `10^scale`, plus resolved zone.
    DateTime64 { value: i64, scale: u32, tz: Tz },
    /// Resolved enum entry: wire ordinal plus declared name.
    Enum { code: i32, name: String },
    Uuid(Uuid),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Array(Array),
    /// Key/value pairs in insertion order.
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    /// One entry per child column, each holding that child's elements
    /// for the row.
    Nested(Vec<Vec<Value>>),
    Point(f64, f64),
    Bitmap(Bitmap),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Resets the slot to the null-or-empty state, dropping held content.
    pub fn reset(&mut self) {
        *self = Value::Null;
    }

    /// Name of the held variant, for conversion error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Int128(_) => "Int128",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::UInt128(_) => "UInt128",
            Value::BigInt(_) => "Int256",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Decimal { .. } => "Decimal",
            Value::BigDecimal { .. } => "Decimal256",
            Value::String(_) => "String",
            Value::FixedString(_) => "FixedString",
            Value::Date { .. } => "Date",
            Value::Date32 { .. } => "Date32",
            Value::DateTime { .. } => "DateTime",
            Value::DateTime64 { .. } => "DateTime64",
            Value::Enum { .. } => "Enum",
            Value::Uuid(_) => "UUID",
            Value::Ipv4(_) => "IPv4",
            Value::Ipv6(_) => "IPv6",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Tuple(_) => "Tuple",
            Value::Nested(_) => "Nested",
            Value::Point(..) => "Point",
            Value::Bitmap(_) => "AggregateFunction",
        }
    }

    fn conversion(&self, to: &str) -> Error {
        Error::Conversion {
            from: self.type_name(),
            to: to.to_string(),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int8(v) => Ok(*v != 0),
            Value::Int16(v) => Ok(*v != 0),
            Value::Int32(v) => Ok(*v != 0),
            Value::Int64(v) => Ok(*v != 0),
            Value::UInt8(v) => Ok(*v != 0),
            Value::UInt16(v) => Ok(*v != 0),
            Value::UInt32(v) => Ok(*v != 0),
            Value::UInt64(v) => Ok(*v != 0),
            Value::String(bytes) => match bytes.as_slice() {
                b"true" | b"1" => Ok(true),
                b"false" | b"0" => Ok(false),
                _ => Err(self.conversion("Bool")),
            },
            _ => Err(self.conversion("Bool")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        let fail = || self.conversion("Int64");
        match self {
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Int8(v) => Ok(i64::from(*v)),
            Value::Int16(v) => Ok(i64::from(*v)),
            Value::Int32(v) => Ok(i64::from(*v)),
            Value::Int64(v) => Ok(*v),
            Value::Int128(v) => i64::try_from(*v).map_err(|_| self.overflow("Int64")),
            Value::UInt8(v) => Ok(i64::from(*v)),
            Value::UInt16(v) => Ok(i64::from(*v)),
            Value::UInt32(v) => Ok(i64::from(*v)),
            Value::UInt64(v) => i64::try_from(*v).map_err(|_| self.overflow("Int64")),
            Value::UInt128(v) => i64::try_from(*v).map_err(|_| self.overflow("Int64")),
            Value::BigInt(v) => i64::try_from(v.clone()).map_err(|_| self.overflow("Int64")),
            Value::Float32(v) => float_to_i64(f64::from(*v)),
            Value::Float64(v) => float_to_i64(*v),
            Value::Enum { code, .. } => Ok(i64::from(*code)),
            Value::Date { days, .. } => Ok(i64::from(*days)),
            Value::Date32 { days, .. } => Ok(i64::from(*days)),
            Value::DateTime { seconds, .. } => Ok(i64::from(*seconds)),
            Value::DateTime64 { value, .. } => Ok(*value),
            Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(fail),
            _ => Err(fail()),
        }
    }

    pub fn as_u64(&self) -> Result<u64> {
        let fail = || self.conversion("UInt64");
        match self {
            Value::Bool(b) => Ok(u64::from(*b)),
            Value::UInt8(v) => Ok(u64::from(*v)),
            Value::UInt16(v) => Ok(u64::from(*v)),
            Value::UInt32(v) => Ok(u64::from(*v)),
            Value::UInt64(v) => Ok(*v),
            Value::UInt128(v) => u64::try_from(*v).map_err(|_| self.overflow("UInt64")),
            Value::Int8(v) => u64::try_from(*v).map_err(|_| self.overflow("UInt64")),
            Value::Int16(v) => u64::try_from(*v).map_err(|_| self.overflow("UInt64")),
            Value::Int32(v) => u64::try_from(*v).map_err(|_| self.overflow("UInt64")),
            Value::Int64(v) => u64::try_from(*v).map_err(|_| self.overflow("UInt64")),
            Value::Int128(v) => u64::try_from(*v).map_err(|_| self.overflow("UInt64")),
            Value::BigInt(v) => u64::try_from(v.clone()).map_err(|_| self.overflow("UInt64")),
            Value::Float32(v) => float_to_u64(f64::from(*v)),
            Value::Float64(v) => float_to_u64(*v),
            Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(fail),
            _ => Err(fail()),
        }
    }

    /// Narrowing helpers built on [`as_i64`](Self::as_i64); each fails on
    /// overflow rather than wrapping.
    pub fn as_i32(&self) -> Result<i32> {
        i32::try_from(self.as_i64()?).map_err(|_| self.overflow("Int32"))
    }

    pub fn as_i16(&self) -> Result<i16> {
        i16::try_from(self.as_i64()?).map_err(|_| self.overflow("Int16"))
    }

    pub fn as_i8(&self) -> Result<i8> {
        i8::try_from(self.as_i64()?).map_err(|_| self.overflow("Int8"))
    }

    pub fn as_u32(&self) -> Result<u32> {
        u32::try_from(self.as_u64()?).map_err(|_| self.overflow("UInt32"))
    }

    pub fn as_u16(&self) -> Result<u16> {
        u16::try_from(self.as_u64()?).map_err(|_| self.overflow("UInt16"))
    }

    pub fn as_u8(&self) -> Result<u8> {
        u8::try_from(self.as_u64()?).map_err(|_| self.overflow("UInt8"))
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Float32(v) => Ok(f64::from(*v)),
            Value::Float64(v) => Ok(*v),
            Value::Decimal { digits, scale } => {
                Ok(*digits as f64 / 10f64.powi(*scale as i32))
            }
            Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| self.conversion("Float64")),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Whole-number content as an arbitrary-precision integer. Decimals
    /// qualify only when their fractional part is zero.
    pub fn as_big_integer(&self) -> Result<BigInt> {
        match self {
            Value::BigInt(v) => Ok(v.clone()),
            Value::Int128(v) => Ok(BigInt::from(*v)),
            Value::UInt128(v) => Ok(BigInt::from(*v)),
            Value::UInt64(v) => Ok(BigInt::from(*v)),
            Value::Decimal { digits, scale } => {
                crate::encoding::decimal::rescale(&BigInt::from(*digits), *scale, 0)
            }
            Value::BigDecimal { digits, scale } => {
                crate::encoding::decimal::rescale(digits, *scale, 0)
            }
            Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| self.conversion("Int256")),
            _ => self.as_i64().map(BigInt::from),
        }
    }

    /// Content as a scaled-integer decimal pair `(digits, scale)`. Never
    /// passes through floating point for decimal or integer content.
    pub fn as_big_decimal(&self) -> Result<(BigInt, u32)> {
        match self {
            Value::Decimal { digits, scale } => Ok((BigInt::from(*digits), *scale)),
            Value::BigDecimal { digits, scale } => Ok((digits.clone(), *scale)),
            Value::String(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|_| self.conversion("Decimal"))?;
                let scale = text
                    .split_once('.')
                    .map_or(0, |(_, frac)| frac.len() as u32);
                let digits = crate::encoding::decimal::parse_decimal(text, scale)?;
                Ok((digits, scale))
            }
            _ => self.as_big_integer().map(|digits| (digits, 0)),
        }
    }

    /// Renders the content as text. String content is interpreted as
    /// UTF-8 with replacement; everything else uses the canonical form.
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Raw byte content of string-like variants.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Value::String(bytes) | Value::FixedString(bytes) => Ok(bytes),
            _ => Err(self.conversion("String")),
        }
    }

    pub fn as_date(&self) -> Result<NaiveDate> {
        let from_days = |days: i64| {
            ChronoDateTime::<Utc>::from_timestamp(days * 86_400, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| self.conversion("Date"))
        };
        match self {
            Value::Date { days, .. } => from_days(i64::from(*days)),
            Value::Date32 { days, .. } => from_days(i64::from(*days)),
            Value::DateTime { .. } | Value::DateTime64 { .. } => {
                Ok(self.as_datetime()?.date_naive())
            }
            _ => Err(self.conversion("Date")),
        }
    }

    /// Zone-aware timestamp content. Date-only values resolve to
    /// midnight in their resolved zone.
    pub fn as_datetime(&self) -> Result<ChronoDateTime<Tz>> {
        let fail = || self.conversion("DateTime");
        match self {
            Value::DateTime { seconds, tz } => tz
                .timestamp_opt(i64::from(*seconds), 0)
                .single()
                .ok_or_else(fail),
            Value::DateTime64 { value, scale, tz } => {
                let nano_shift = 9u32.checked_sub(*scale).ok_or_else(fail)?;
                let divisor = 10i64.pow(*scale);
                let seconds = value.div_euclid(divisor);
                let nanos = (value.rem_euclid(divisor)) as u32 * 10u32.pow(nano_shift);
                tz.timestamp_opt(seconds, nanos).single().ok_or_else(fail)
            }
            Value::Date { tz, .. } | Value::Date32 { tz, .. } => {
                let date = self.as_date()?;
                date.and_hms_opt(0, 0, 0)
                    .and_then(|naive| tz.from_local_datetime(&naive).earliest())
                    .ok_or_else(fail)
            }
            _ => Err(fail()),
        }
    }

    pub fn as_array(&self) -> Result<Vec<Value>> {
        match self {
            Value::Array(arr) => Ok(arr.to_values()),
            Value::Tuple(fields) => Ok(fields.clone()),
            _ => Err(self.conversion("Array")),
        }
    }

    pub fn as_map(&self) -> Result<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Ok(pairs),
            _ => Err(self.conversion("Map")),
        }
    }

    pub fn as_tuple(&self) -> Result<&[Value]> {
        match self {
            Value::Tuple(fields) => Ok(fields),
            _ => Err(self.conversion("Tuple")),
        }
    }

    /// Rebuilds this slot as an array from another container, into a
    /// freshly sized backing array.
    ///
    /// Arrays and tuples copy positionally. Maps copy by key ordinal:
    /// the entry at insertion position `i` must carry the key `i + 1`,
    /// and a mismatched or non-integral key fails instead of
    /// substituting a default.
    pub fn update_array(&mut self, source: Value) -> Result<()> {
        let values = match source {
            Value::Array(arr) => arr.to_values(),
            Value::Tuple(fields) => fields,
            Value::Map(pairs) => {
                let mut values = Vec::with_capacity(pairs.len());
                for (position, (key, value)) in pairs.into_iter().enumerate() {
                    let expected = position as u64 + 1;
                    let ordinal = key.as_u64().map_err(|_| Error::Conversion {
                        from: "Map",
                        to: format!("Array (non-integral key at position {position})"),
                    })?;
                    if ordinal != expected {
                        return Err(Error::Conversion {
                            from: "Map",
                            to: format!(
                                "Array (key {ordinal} at position {position}, expected {expected})"
                            ),
                        });
                    }
                    values.push(value);
                }
                values
            }
            other => {
                return Err(Error::Conversion {
                    from: other.type_name(),
                    to: "Array".to_string(),
                })
            }
        };
        *self = Value::Array(Array::Boxed(values));
        Ok(())
    }

    /// The padding/default value for a column: what a shorter tuple row
    /// is padded with and what a null encodes as under a non-nullable
    /// column.
    pub fn default_for(column: &Column) -> Value {
        match column.data_type() {
            DataType::Bool => Value::Bool(false),
            DataType::Int8 => Value::Int8(0),
            DataType::Int16 => Value::Int16(0),
            DataType::Int32 => Value::Int32(0),
            DataType::Int64 => Value::Int64(0),
            DataType::Int128 => Value::Int128(0),
            DataType::UInt8 => Value::UInt8(0),
            DataType::UInt16 => Value::UInt16(0),
            DataType::UInt32 => Value::UInt32(0),
            DataType::UInt64 => Value::UInt64(0),
            DataType::UInt128 => Value::UInt128(0),
            DataType::Int256 | DataType::UInt256 => Value::BigInt(BigInt::from(0)),
            DataType::Float32 => Value::Float32(0.0),
            DataType::Float64 => Value::Float64(0.0),
            DataType::Decimal | DataType::Decimal32 | DataType::Decimal64
            | DataType::Decimal128 => Value::Decimal {
                digits: 0,
                scale: column.scale().unwrap_or(0),
            },
            DataType::Decimal256 => Value::BigDecimal {
                digits: BigInt::from(0),
                scale: column.scale().unwrap_or(0),
            },
            DataType::String => Value::String(Vec::new()),
            DataType::FixedString => {
                Value::FixedString(vec![0u8; column.fixed_length().unwrap_or(0)])
            }
            DataType::Date => Value::Date {
                days: 0,
                tz: Tz::UTC,
            },
            DataType::Date32 => Value::Date32 {
                days: 0,
                tz: Tz::UTC,
            },
            DataType::DateTime | DataType::DateTime32 => Value::DateTime {
                seconds: 0,
                tz: column.timezone().unwrap_or(Tz::UTC),
            },
            DataType::DateTime64 => Value::DateTime64 {
                value: 0,
                scale: column.scale().unwrap_or(3),
                tz: column.timezone().unwrap_or(Tz::UTC),
            },
            DataType::Enum8 | DataType::Enum16 => {
                let entry = column
                    .enum_table()
                    .and_then(|t| t.entries().first().cloned());
                match entry {
                    Some((name, code)) => Value::Enum { code, name },
                    None => Value::Enum {
                        code: 0,
                        name: String::new(),
                    },
                }
            }
            DataType::Uuid => Value::Uuid(Uuid::nil()),
            DataType::Ipv4 => Value::Ipv4(Ipv4Addr::UNSPECIFIED),
            DataType::Ipv6 => Value::Ipv6(Ipv6Addr::UNSPECIFIED),
            DataType::Array | DataType::Ring | DataType::Polygon
            | DataType::MultiPolygon => Value::Array(Array::Boxed(Vec::new())),
            DataType::Map => Value::Map(Vec::new()),
            DataType::Tuple => Value::Tuple(
                column.children().iter().map(Value::default_for).collect(),
            ),
            DataType::Nested => {
                Value::Nested(column.children().iter().map(|_| Vec::new()).collect())
            }
            DataType::Point => Value::Point(0.0, 0.0),
            DataType::AggregateFunction => Value::Null,
        }
    }

    fn overflow(&self, target: &'static str) -> Error {
        Error::Overflow {
            value: self.as_string(),
            target,
        }
    }
}

fn float_to_i64(value: f64) -> Result<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(Error::Overflow {
            value: value.to_string(),
            target: "Int64",
        });
    }
    Ok(truncated as i64)
}

fn float_to_u64(value: f64) -> Result<u64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < 0.0 || truncated >= u64::MAX as f64 {
        return Err(Error::Overflow {
            value: value.to_string(),
            target: "UInt64",
        });
    }
    Ok(truncated as u64)
}

/// Scale-aligned decimal comparison: `1.50` equals `1.5`.
fn decimal_eq(a_digits: &BigInt, a_scale: u32, b_digits: &BigInt, b_scale: u32) -> bool {
    use std::cmp::Ordering;
    match a_scale.cmp(&b_scale) {
        Ordering::Equal => a_digits == b_digits,
        Ordering::Less => &(a_digits * BigInt::from(10).pow(b_scale - a_scale)) == b_digits,
        Ordering::Greater => a_digits == &(b_digits * BigInt::from(10).pow(a_scale - b_scale)),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int8(a), Int8(b)) => a == b,
            (Int16(a), Int16(b)) => a == b,
            (Int32(a), Int32(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (Int128(a), Int128(b)) => a == b,
            (UInt8(a), UInt8(b)) => a == b,
            (UInt16(a), UInt16(b)) => a == b,
            (UInt32(a), UInt32(b)) => a == b,
            (UInt64(a), UInt64(b)) => a == b,
            (UInt128(a), UInt128(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Float32(a), Float32(b)) => a == b,
            (Float64(a), Float64(b)) => a == b,
            (
                Decimal { digits: a, scale: sa },
                Decimal { digits: b, scale: sb },
            ) => decimal_eq(
                &num_bigint::BigInt::from(*a),
                *sa,
                &num_bigint::BigInt::from(*b),
                *sb,
            ),
            (
                BigDecimal { digits: a, scale: sa },
                BigDecimal { digits: b, scale: sb },
            ) => decimal_eq(a, *sa, b, *sb),
            (
                Decimal { digits: a, scale: sa },
                BigDecimal { digits: b, scale: sb },
            )
            | (
                BigDecimal { digits: b, scale: sb },
                Decimal { digits: a, scale: sa },
            ) => decimal_eq(&num_bigint::BigInt::from(*a), *sa, b, *sb),
            (String(a), String(b)) => a == b,
            (FixedString(a), FixedString(b)) => a == b,
            (Date { days: a, tz: ta }, Date { days: b, tz: tb }) => a == b && ta == tb,
            (Date32 { days: a, tz: ta }, Date32 { days: b, tz: tb }) => a == b && ta == tb,
            (
                DateTime { seconds: a, tz: ta },
                DateTime { seconds: b, tz: tb },
            ) => a == b && ta == tb,
            (
                DateTime64 { value: a, scale: sa, tz: ta },
                DateTime64 { value: b, scale: sb, tz: tb },
            ) => a == b && sa == sb && ta == tb,
            (Enum { code: a, .. }, Enum { code: b, .. }) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (Ipv4(a), Ipv4(b)) => a == b,
            (Ipv6(a), Ipv6(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            (Nested(a), Nested(b)) => a == b,
            (Point(ax, ay), Point(bx, by)) => ax == bx && ay == by,
            (Bitmap(a), Bitmap(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Int128(v) => write!(f, "{v}"),
            Value::UInt8(v) => write!(f, "{v}"),
            Value::UInt16(v) => write!(f, "{v}"),
            Value::UInt32(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::UInt128(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Decimal { digits, scale } => f.write_str(&format_decimal(*digits, *scale)),
            Value::BigDecimal { digits, scale } => {
                f.write_str(&format_big_decimal(digits, *scale))
            }
            Value::String(bytes) | Value::FixedString(bytes) => {
                f.write_str(&String::from_utf8_lossy(bytes))
            }
            Value::Date { .. } | Value::Date32 { .. } => match self.as_date() {
                Ok(date) => write!(f, "{date}"),
                Err(_) => f.write_str("invalid date"),
            },
            Value::DateTime { .. } | Value::DateTime64 { .. } => match self.as_datetime() {
                Ok(dt) => write!(f, "{dt}"),
                Err(_) => f.write_str("invalid datetime"),
            },
            Value::Enum { name, .. } => f.write_str(name),
            Value::Uuid(uuid) => write!(f, "{uuid}"),
            Value::Ipv4(addr) => write!(f, "{addr}"),
            Value::Ipv6(addr) => write!(f, "{addr}"),
            Value::Array(arr) => {
                f.write_str("[")?;
                for (idx, value) in arr.to_values().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Value::Map(pairs) => {
                f.write_str("{")?;
                for (idx, (key, value)) in pairs.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Tuple(fields) => {
                f.write_str("(")?;
                for (idx, value) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Value::Nested(children) => {
                f.write_str("Nested[")?;
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str("[")?;
                    for (jdx, value) in child.iter().enumerate() {
                        if jdx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{value}")?;
                    }
                    f.write_str("]")?;
                }
                f.write_str("]")
            }
            Value::Point(x, y) => write!(f, "({x}, {y})"),
            Value::Bitmap(bitmap) => write!(f, "bitmap[{}]", bitmap.cardinality()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_state_is_explicit() {
        let mut value = Value::Int32(7);
        assert!(!value.is_null());
        value.reset();
        assert!(value.is_null());
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn widening_conversions() {
        assert_eq!(Value::Int8(-5).as_i64().unwrap(), -5);
        assert_eq!(Value::UInt32(7).as_i64().unwrap(), 7);
        assert_eq!(Value::Bool(true).as_i64().unwrap(), 1);
        assert_eq!(Value::Int32(42).as_f64().unwrap(), 42.0);
        assert_eq!(
            Value::UInt64(u64::MAX).as_big_integer().unwrap(),
            BigInt::from(u64::MAX)
        );
    }

    #[test]
    fn narrowing_fails_on_overflow() {
        assert!(matches!(
            Value::Int64(300).as_i8().unwrap_err(),
            Error::Overflow { .. }
        ));
        assert!(matches!(
            Value::UInt64(u64::MAX).as_i64().unwrap_err(),
            Error::Overflow { .. }
        ));
        assert!(matches!(
            Value::Int32(-1).as_u64().unwrap_err(),
            Error::Overflow { .. }
        ));
        assert_eq!(Value::Int64(127).as_i8().unwrap(), 127);
    }

    #[test]
    fn float_to_integral_truncates_toward_zero() {
        assert_eq!(Value::Float64(2.9).as_i64().unwrap(), 2);
        assert_eq!(Value::Float64(-2.9).as_i64().unwrap(), -2);
        assert_eq!(Value::Float32(1.5).as_u64().unwrap(), 1);
        assert!(Value::Float64(f64::NAN).as_i64().is_err());
        assert!(Value::Float64(1e300).as_i64().is_err());
    }

    #[test]
    fn string_parses_numerically() {
        assert_eq!(Value::String(b"123".to_vec()).as_i64().unwrap(), 123);
        assert_eq!(Value::String(b"true".to_vec()).as_bool().unwrap(), true);
        assert!(Value::String(b"abc".to_vec()).as_i64().is_err());
    }

    #[test]
    fn decimal_equality_is_scale_aligned() {
        let a = Value::Decimal { digits: 150, scale: 2 };
        let b = Value::Decimal { digits: 1500, scale: 3 };
        let c = Value::Decimal { digits: 151, scale: 2 };
        assert_eq!(a, b);
        assert_ne!(a, c);

        let big = Value::BigDecimal {
            digits: BigInt::from(1500),
            scale: 3,
        };
        assert_eq!(a, big);
    }

    #[test]
    fn decimal_never_routes_through_floats() {
        let value = Value::BigDecimal {
            digits: "1234567890123456789012345".parse().unwrap(),
            scale: 15,
        };
        assert_eq!(value.as_string(), "1234567890.123456789012345");
        let (digits, scale) = value.as_big_decimal().unwrap();
        assert_eq!(digits.to_string(), "1234567890123456789012345");
        assert_eq!(scale, 15);
    }

    #[test]
    fn date_and_datetime_rendering() {
        let date = Value::Date {
            days: 1,
            tz: Tz::UTC,
        };
        assert_eq!(date.as_date().unwrap().to_string(), "1970-01-02");

        let dt = Value::DateTime {
            seconds: 86_400,
            tz: Tz::UTC,
        };
        assert_eq!(dt.as_date().unwrap().to_string(), "1970-01-02");

        let dt64 = Value::DateTime64 {
            value: 1_500,
            scale: 3,
            tz: Tz::UTC,
        };
        let stamp = dt64.as_datetime().unwrap();
        assert_eq!(stamp.timestamp(), 1);
        assert_eq!(stamp.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn negative_date32_maps_before_epoch() {
        let date = Value::Date32 {
            days: -1,
            tz: Tz::UTC,
        };
        assert_eq!(date.as_date().unwrap().to_string(), "1969-12-31");
    }

    #[test]
    fn date_resolves_to_midnight_in_its_zone() {
        let utc = Value::Date {
            days: 1,
            tz: Tz::UTC,
        };
        let tokyo = Value::Date {
            days: 1,
            tz: Tz::Asia__Tokyo,
        };
        assert_ne!(utc, tokyo);

        let utc_midnight = utc.as_datetime().unwrap();
        let tokyo_midnight = tokyo.as_datetime().unwrap();
        assert_eq!(utc_midnight.naive_local(), tokyo_midnight.naive_local());
        // Tokyo midnight is nine hours earlier on the absolute timeline.
        assert_eq!(
            utc_midnight.timestamp() - tokyo_midnight.timestamp(),
            9 * 3600
        );
    }

    #[test]
    fn update_array_copies_positionally() {
        let mut slot = Value::Null;
        slot.update_array(Value::Tuple(vec![Value::Int32(1), Value::Int32(2)]))
            .unwrap();
        assert_eq!(slot.as_array().unwrap().len(), 2);
        assert_eq!(slot.as_array().unwrap()[1], Value::Int32(2));
    }

    #[test]
    fn update_array_from_map_by_ordinal() {
        let mut slot = Value::Null;
        slot.update_array(Value::Map(vec![
            (Value::UInt8(1), Value::String(b"x".to_vec())),
            (Value::UInt8(2), Value::String(b"y".to_vec())),
        ]))
        .unwrap();
        assert_eq!(slot.as_array().unwrap()[0], Value::String(b"x".to_vec()));
    }

    #[test]
    fn update_array_rejects_mismatched_ordinals() {
        let mut slot = Value::Null;
        let err = slot
            .update_array(Value::Map(vec![
                (Value::UInt8(1), Value::Int32(1)),
                (Value::UInt8(5), Value::Int32(2)),
            ]))
            .unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));

        let err = slot
            .update_array(Value::Map(vec![(
                Value::String(b"a".to_vec()),
                Value::Int32(1),
            )]))
            .unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn update_array_rejects_scalars() {
        let mut slot = Value::Null;
        assert!(slot.update_array(Value::Int32(5)).is_err());
    }

    #[test]
    fn clone_is_deep() {
        let original = Value::Array(Array::Boxed(vec![Value::String(b"a".to_vec())]));
        let mut copy = original.clone();
        copy.reset();
        assert!(!original.is_null());
        assert_eq!(original.as_array().unwrap().len(), 1);
    }

    #[test]
    fn flat_arrays_box_on_demand() {
        let arr = Array::Int32(vec![1, 2, 3]);
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.value_at(1), Some(Value::Int32(2)));
        assert_eq!(arr.value_at(3), None);
        assert_eq!(
            arr.to_values(),
            vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]
        );
    }

    #[test]
    fn defaults_match_column_shape() {
        let col = Column::new("n", DataType::Int32);
        assert_eq!(Value::default_for(&col), Value::Int32(0));

        let col = Column::fixed_string("f", 4);
        assert_eq!(
            Value::default_for(&col),
            Value::FixedString(vec![0, 0, 0, 0])
        );

        let col = Column::tuple(
            "t",
            vec![
                Column::new("", DataType::Int32),
                Column::new("", DataType::String),
            ],
        );
        assert_eq!(
            Value::default_for(&col),
            Value::Tuple(vec![Value::Int32(0), Value::String(Vec::new())])
        );

        let col = Column::enum8("e", vec![("ok".to_string(), 1)]);
        assert_eq!(
            Value::default_for(&col),
            Value::Enum {
                code: 1,
                name: "ok".to_string()
            }
        );
    }

    #[test]
    fn enum_equality_compares_ordinals() {
        let a = Value::Enum {
            code: 1,
            name: "ok".to_string(),
        };
        let b = Value::Enum {
            code: 1,
            name: "OK".to_string(),
        };
        assert_eq!(a, b);
    }

    #[test]
    fn display_renders_containers() {
        let map = Value::Map(vec![(
            Value::String(b"a".to_vec()),
            Value::Int32(1),
        )]);
        assert_eq!(map.as_string(), "{a: 1}");

        let arr = Value::Array(Array::Int32(vec![1, 2]));
        assert_eq!(arr.as_string(), "[1, 2]");

        let point = Value::Point(1.5, -2.0);
        assert_eq!(point.as_string(), "(1.5, -2)");
    }
}
