//! # RowBinary Data Type Tags
//!
//! The canonical `DataType` enum covering every column type this codec
//! can frame. The enum is metadata-free: precision, scale, time zones,
//! element types and enum tables live in [`Column`](super::Column), so a
//! tag fits in one byte and dispatch is an exhaustive `match`.
//!
//! ## Type Categories
//!
//! | Category | Tags | Wire width |
//! |----------|------|------------|
//! | **Boolean** | Bool | 1 |
//! | **Signed ints** | Int8..Int256 | 1, 2, 4, 8, 16, 32 |
//! | **Unsigned ints** | UInt8..UInt256 | 1, 2, 4, 8, 16, 32 |
//! | **Floats** | Float32, Float64 | 4, 8 |
//! | **Decimals** | Decimal, Decimal32..Decimal256 | by precision |
//! | **Temporal** | Date, Date32, DateTime, DateTime32, DateTime64 | 2, 4, 4, 4, 8 |
//! | **Enums** | Enum8, Enum16 | 1, 2 |
//! | **Strings** | String, FixedString | varint+N, N |
//! | **Identifiers** | Uuid, Ipv4, Ipv6 | 16, 4, 16 |
//! | **Composite** | Array, Map, Tuple, Nested | varint-framed |
//! | **Geometric** | Point, Ring, Polygon, MultiPolygon | recursive |
//! | **Aggregate** | AggregateFunction | function-specific |
//!
//! Composite tags (everything varint-framed or recursive) are never
//! individually nullable; only their leaf members may be. `can_be_null`
//! encodes that rule for the constructors and the descriptor parser.

use crate::error::Error;

/// Canonical type tag for one RowBinary column.
///
/// Uses `#[repr(u8)]` so a tag is a single-byte discriminant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool = 0,
    Int8 = 1,
    Int16 = 2,
    Int32 = 3,
    Int64 = 4,
    Int128 = 5,
    Int256 = 6,
    UInt8 = 7,
    UInt16 = 8,
    UInt32 = 9,
    UInt64 = 10,
    UInt128 = 11,
    UInt256 = 12,
    Float32 = 13,
    Float64 = 14,

    Decimal = 20,
    Decimal32 = 21,
    Decimal64 = 22,
    Decimal128 = 23,
    Decimal256 = 24,

    Date = 30,
    Date32 = 31,
    DateTime = 32,
    DateTime32 = 33,
    DateTime64 = 34,

    Enum8 = 40,
    Enum16 = 41,

    String = 50,
    FixedString = 51,
    Uuid = 52,
    Ipv4 = 53,
    Ipv6 = 54,

    Array = 60,
    Map = 61,
    Tuple = 62,
    Nested = 63,

    Point = 70,
    Ring = 71,
    Polygon = 72,
    MultiPolygon = 73,

    AggregateFunction = 80,
}

impl DataType {
    /// Canonical (server-side) spelling of this tag.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "Bool",
            DataType::Int8 => "Int8",
            DataType::Int16 => "Int16",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Int128 => "Int128",
            DataType::Int256 => "Int256",
            DataType::UInt8 => "UInt8",
            DataType::UInt16 => "UInt16",
            DataType::UInt32 => "UInt32",
            DataType::UInt64 => "UInt64",
            DataType::UInt128 => "UInt128",
            DataType::UInt256 => "UInt256",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
            DataType::Decimal => "Decimal",
            DataType::Decimal32 => "Decimal32",
            DataType::Decimal64 => "Decimal64",
            DataType::Decimal128 => "Decimal128",
            DataType::Decimal256 => "Decimal256",
            DataType::Date => "Date",
            DataType::Date32 => "Date32",
            DataType::DateTime => "DateTime",
            DataType::DateTime32 => "DateTime32",
            DataType::DateTime64 => "DateTime64",
            DataType::Enum8 => "Enum8",
            DataType::Enum16 => "Enum16",
            DataType::String => "String",
            DataType::FixedString => "FixedString",
            DataType::Uuid => "UUID",
            DataType::Ipv4 => "IPv4",
            DataType::Ipv6 => "IPv6",
            DataType::Array => "Array",
            DataType::Map => "Map",
            DataType::Tuple => "Tuple",
            DataType::Nested => "Nested",
            DataType::Point => "Point",
            DataType::Ring => "Ring",
            DataType::Polygon => "Polygon",
            DataType::MultiPolygon => "MultiPolygon",
            DataType::AggregateFunction => "AggregateFunction",
        }
    }

    /// Resolves a tag name case-insensitively. Arguments (`Decimal(9,2)`)
    /// are the descriptor parser's job; this matches bare names only.
    pub fn from_name(name: &str) -> Result<DataType, Error> {
        let dt = match name.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => DataType::Bool,
            "int8" => DataType::Int8,
            "int16" => DataType::Int16,
            "int32" => DataType::Int32,
            "int64" => DataType::Int64,
            "int128" => DataType::Int128,
            "int256" => DataType::Int256,
            "uint8" => DataType::UInt8,
            "uint16" => DataType::UInt16,
            "uint32" => DataType::UInt32,
            "uint64" => DataType::UInt64,
            "uint128" => DataType::UInt128,
            "uint256" => DataType::UInt256,
            "float32" => DataType::Float32,
            "float64" => DataType::Float64,
            "decimal" => DataType::Decimal,
            "decimal32" => DataType::Decimal32,
            "decimal64" => DataType::Decimal64,
            "decimal128" => DataType::Decimal128,
            "decimal256" => DataType::Decimal256,
            "date" => DataType::Date,
            "date32" => DataType::Date32,
            "datetime" => DataType::DateTime,
            "datetime32" => DataType::DateTime32,
            "datetime64" => DataType::DateTime64,
            "enum8" => DataType::Enum8,
            "enum16" => DataType::Enum16,
            "string" => DataType::String,
            "fixedstring" => DataType::FixedString,
            "uuid" => DataType::Uuid,
            "ipv4" => DataType::Ipv4,
            "ipv6" => DataType::Ipv6,
            "array" => DataType::Array,
            "map" => DataType::Map,
            "tuple" => DataType::Tuple,
            "nested" => DataType::Nested,
            "point" => DataType::Point,
            "ring" => DataType::Ring,
            "polygon" => DataType::Polygon,
            "multipolygon" => DataType::MultiPolygon,
            "aggregatefunction" => DataType::AggregateFunction,
            _ => return Err(Error::UnknownType(name.to_string())),
        };
        Ok(dt)
    }

    /// Returns true for the numeric scalar tags eligible for the flat
    /// depth-1 array fast path.
    pub fn is_flat_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }

    /// Returns true for composite tags (varint-framed or recursive).
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            DataType::Array
                | DataType::Map
                | DataType::Tuple
                | DataType::Nested
                | DataType::Ring
                | DataType::Polygon
                | DataType::MultiPolygon
                | DataType::AggregateFunction
        )
    }

    /// Composite types are never individually nullable in RowBinary.
    pub fn can_be_null(&self) -> bool {
        !self.is_composite()
    }

    /// Returns true for the decimal family.
    pub fn is_decimal(&self) -> bool {
        matches!(
            self,
            DataType::Decimal
                | DataType::Decimal32
                | DataType::Decimal64
                | DataType::Decimal128
                | DataType::Decimal256
        )
    }

    /// Returns true for the tags whose descriptor carries a time zone.
    pub fn has_timezone(&self) -> bool {
        matches!(
            self,
            DataType::DateTime | DataType::DateTime32 | DataType::DateTime64
        )
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(DataType::from_name("int32").unwrap(), DataType::Int32);
        assert_eq!(DataType::from_name("Int32").unwrap(), DataType::Int32);
        assert_eq!(DataType::from_name("UUID").unwrap(), DataType::Uuid);
        assert_eq!(DataType::from_name("ipv6").unwrap(), DataType::Ipv6);
    }

    #[test]
    fn unknown_name_is_a_typed_error() {
        let err = DataType::from_name("Int512").unwrap_err();
        assert!(matches!(err, Error::UnknownType(ref t) if t == "Int512"));
    }

    #[test]
    fn composite_tags_cannot_be_null() {
        assert!(!DataType::Array.can_be_null());
        assert!(!DataType::Map.can_be_null());
        assert!(!DataType::Tuple.can_be_null());
        assert!(!DataType::AggregateFunction.can_be_null());
        assert!(DataType::Int32.can_be_null());
        assert!(DataType::String.can_be_null());
    }

    #[test]
    fn flat_numeric_covers_fixed_width_scalars_only() {
        assert!(DataType::Int32.is_flat_numeric());
        assert!(DataType::Float64.is_flat_numeric());
        assert!(!DataType::Int128.is_flat_numeric());
        assert!(!DataType::String.is_flat_numeric());
        assert!(!DataType::Decimal.is_flat_numeric());
    }

    #[test]
    fn canonical_names_round_trip() {
        for dt in [
            DataType::Bool,
            DataType::Int256,
            DataType::UInt64,
            DataType::DateTime64,
            DataType::FixedString,
            DataType::MultiPolygon,
            DataType::AggregateFunction,
        ] {
            assert_eq!(DataType::from_name(dt.name()).unwrap(), dt);
        }
    }
}
