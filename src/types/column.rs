//! # Column Descriptors
//!
//! A `Column` pairs a [`DataType`] tag with the per-column metadata the
//! codec needs to frame values: nullability, precision/scale, fixed
//! length, time zone, child columns, the enum name↔code table, the array
//! base type and nesting depth, and the aggregate function name.
//!
//! ## Invariants
//!
//! - A `Column` is immutable after construction; the codec only reads it.
//! - Descriptors are acyclic: composite children are built before their
//!   parent and always terminate in scalars.
//! - Composite types are never individually nullable; constructors and
//!   the descriptor parser both reject `Nullable(Array(..))` and friends.
//!
//! ## Construction
//!
//! ```ignore
//! use rowbinary::types::{Column, DataType};
//!
//! let id = Column::new("id", DataType::Int32);
//! let name = Column::new("name", DataType::String).nullable()?;
//! let price = Column::decimal("price", 19, 15);
//! let tags = Column::array("tags", Column::new("", DataType::Int32));
//! ```
//!
//! `Display` renders the canonical descriptor string back out
//! (`Nullable(Array(Int32))`), which the header writer relies on.

use super::DataType;
use crate::error::{Error, Result};
use chrono_tz::Tz;
use hashbrown::HashMap;

/// Declared name↔code table for `Enum8`/`Enum16` columns.
///
/// Entries keep declaration order so descriptor rendering is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumTable {
    entries: Vec<(String, i32)>,
    by_code: HashMap<i32, usize>,
    by_name: HashMap<String, i32>,
}

impl EnumTable {
    pub fn new(entries: Vec<(String, i32)>) -> Self {
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(idx, (_, code))| (*code, idx))
            .collect();
        let by_name = entries
            .iter()
            .map(|(name, code)| (name.clone(), *code))
            .collect();
        Self {
            entries,
            by_code,
            by_name,
        }
    }

    /// Resolves a wire ordinal to its declared name.
    pub fn name_of(&self, code: i32) -> Option<&str> {
        self.by_code
            .get(&code)
            .map(|&idx| self.entries[idx].0.as_str())
    }

    /// Resolves a declared name to its wire ordinal.
    pub fn code_of(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    pub fn entries(&self) -> &[(String, i32)] {
        &self.entries
    }
}

/// Immutable metadata for one column in a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data_type: DataType,
    nullable: bool,
    precision: Option<u32>,
    scale: Option<u32>,
    fixed_length: Option<usize>,
    timezone: Option<Tz>,
    children: Vec<Column>,
    enum_table: Option<EnumTable>,
    function: Option<String>,
    array_base: Option<DataType>,
    array_depth: usize,
}

impl Column {
    /// Creates a plain column with no extra metadata.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            precision: None,
            scale: None,
            fixed_length: None,
            timezone: None,
            children: Vec::new(),
            enum_table: None,
            function: None,
            array_base: None,
            array_depth: 0,
        }
    }

    /// Marks the column nullable. Fails for composite types, which carry
    /// nullability only on their leaf members.
    pub fn nullable(mut self) -> Result<Self> {
        if !self.data_type.can_be_null() {
            return Err(Error::TypeParse {
                input: self.data_type.name().to_string(),
                position: 0,
                reason: "composite types cannot be Nullable".to_string(),
            });
        }
        self.nullable = true;
        Ok(self)
    }

    /// Creates a generic `Decimal(P, S)` column. Wire width is selected
    /// from the precision at encode/decode time.
    pub fn decimal(name: impl Into<String>, precision: u32, scale: u32) -> Self {
        let mut col = Column::new(name, DataType::Decimal);
        col.precision = Some(precision);
        col.scale = Some(scale);
        col
    }

    /// Creates a fixed-width decimal column (`Decimal32(S)` etc).
    pub fn decimal_sized(name: impl Into<String>, data_type: DataType, scale: u32) -> Self {
        debug_assert!(data_type.is_decimal());
        let mut col = Column::new(name, data_type);
        col.precision = Some(match data_type {
            DataType::Decimal32 => 9,
            DataType::Decimal64 => 18,
            DataType::Decimal128 => 38,
            _ => 76,
        });
        col.scale = Some(scale);
        col
    }

    /// Creates a `FixedString(N)` column.
    pub fn fixed_string(name: impl Into<String>, length: usize) -> Self {
        let mut col = Column::new(name, DataType::FixedString);
        col.fixed_length = Some(length);
        col
    }

    /// Creates a `DateTime` column, optionally zone-qualified.
    pub fn datetime(name: impl Into<String>, timezone: Option<Tz>) -> Self {
        let mut col = Column::new(name, DataType::DateTime);
        col.timezone = timezone;
        col
    }

    /// Creates a `DateTime64(scale)` column, optionally zone-qualified.
    pub fn datetime64(name: impl Into<String>, scale: u32, timezone: Option<Tz>) -> Self {
        let mut col = Column::new(name, DataType::DateTime64);
        col.scale = Some(scale);
        col.timezone = timezone;
        col
    }

    /// Creates an `Enum8` column from (name, code) pairs.
    pub fn enum8(name: impl Into<String>, entries: Vec<(String, i32)>) -> Self {
        let mut col = Column::new(name, DataType::Enum8);
        col.enum_table = Some(EnumTable::new(entries));
        col
    }

    /// Creates an `Enum16` column from (name, code) pairs.
    pub fn enum16(name: impl Into<String>, entries: Vec<(String, i32)>) -> Self {
        let mut col = Column::new(name, DataType::Enum16);
        col.enum_table = Some(EnumTable::new(entries));
        col
    }

    /// Creates an `Array(T)` column. Base type and nesting depth are
    /// derived here so the flat fast path is a field lookup, not a walk.
    pub fn array(name: impl Into<String>, element: Column) -> Self {
        let (base, depth) = match element.data_type {
            DataType::Array => (element.array_base, element.array_depth + 1),
            other => (Some(other), 1),
        };
        let mut col = Column::new(name, DataType::Array);
        col.array_base = base;
        col.array_depth = depth;
        col.children = vec![element];
        col
    }

    /// Creates a `Map(K, V)` column.
    pub fn map(name: impl Into<String>, key: Column, value: Column) -> Self {
        let mut col = Column::new(name, DataType::Map);
        col.children = vec![key, value];
        col
    }

    /// Creates a `Tuple(T1..Tn)` column.
    pub fn tuple(name: impl Into<String>, fields: Vec<Column>) -> Self {
        let mut col = Column::new(name, DataType::Tuple);
        col.children = fields;
        col
    }

    /// Creates a `Nested(c1..cn)` column. Children must be named.
    pub fn nested(name: impl Into<String>, children: Vec<Column>) -> Self {
        let mut col = Column::new(name, DataType::Nested);
        col.children = children;
        col
    }

    /// Creates an `AggregateFunction(func, T)` column.
    pub fn aggregate_function(
        name: impl Into<String>,
        function: impl Into<String>,
        inner: Column,
    ) -> Self {
        let mut col = Column::new(name, DataType::AggregateFunction);
        col.function = Some(function.into());
        col.children = vec![inner];
        col
    }

    /// Parses a type-descriptor string into a column with the given name.
    pub fn parse(name: impl Into<String>, descriptor: &str) -> Result<Self> {
        let col = super::parse::parse_descriptor(descriptor)?;
        Ok(col.with_name(name))
    }

    /// Replaces the column name, keeping all other metadata.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Declared scale; `DateTime64` columns without one default to 3.
    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub fn fixed_length(&self) -> Option<usize> {
        self.fixed_length
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Child columns: array element, map key/value, tuple fields, nested
    /// children, aggregate inner type.
    pub fn children(&self) -> &[Column] {
        &self.children
    }

    /// Child column at `index`. Composite columns built without their
    /// required element types fail here instead of panicking in the
    /// codec.
    pub fn child(&self, index: usize) -> Result<&Column> {
        self.children.get(index).ok_or_else(|| {
            Error::UnknownType(format!(
                "{} missing child type {index}",
                self.type_string()
            ))
        })
    }

    pub fn enum_table(&self) -> Option<&EnumTable> {
        self.enum_table.as_ref()
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Base element type of an array chain (`Array(Array(Int32))` → `Int32`).
    pub fn array_base(&self) -> Option<DataType> {
        self.array_base
    }

    /// Array nesting depth (`Array(Array(Int32))` → 2; non-arrays → 0).
    pub fn array_depth(&self) -> usize {
        self.array_depth
    }

    /// Canonical descriptor string, e.g. `Nullable(Array(Int32))`.
    pub fn type_string(&self) -> String {
        self.to_string()
    }

    pub(crate) fn set_timezone(&mut self, timezone: Option<Tz>) {
        self.timezone = timezone;
    }

    fn fmt_inner(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.data_type {
            DataType::Decimal => write!(
                f,
                "Decimal({}, {})",
                self.precision.unwrap_or(10),
                self.scale.unwrap_or(0)
            ),
            DataType::Decimal32 | DataType::Decimal64 | DataType::Decimal128
            | DataType::Decimal256 => {
                write!(f, "{}({})", self.data_type.name(), self.scale.unwrap_or(0))
            }
            DataType::FixedString => {
                write!(f, "FixedString({})", self.fixed_length.unwrap_or(0))
            }
            DataType::DateTime | DataType::DateTime32 => match self.timezone {
                Some(tz) => write!(f, "{}('{}')", self.data_type.name(), tz.name()),
                None => f.write_str(self.data_type.name()),
            },
            DataType::DateTime64 => {
                let scale = self.scale.unwrap_or(3);
                match self.timezone {
                    Some(tz) => write!(f, "DateTime64({}, '{}')", scale, tz.name()),
                    None => write!(f, "DateTime64({})", scale),
                }
            }
            DataType::Enum8 | DataType::Enum16 => {
                write!(f, "{}(", self.data_type.name())?;
                if let Some(table) = &self.enum_table {
                    for (idx, (name, code)) in table.entries().iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "'{}' = {}", name.replace('\'', "\\'"), code)?;
                    }
                }
                f.write_str(")")
            }
            DataType::Array => write!(f, "Array({})", self.children[0]),
            DataType::Map => write!(f, "Map({}, {})", self.children[0], self.children[1]),
            DataType::Tuple => {
                f.write_str("Tuple(")?;
                for (idx, child) in self.children.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    if child.name.is_empty() {
                        write!(f, "{}", child)?;
                    } else {
                        write!(f, "{} {}", child.name, child)?;
                    }
                }
                f.write_str(")")
            }
            DataType::Nested => {
                f.write_str("Nested(")?;
                for (idx, child) in self.children.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", child.name, child)?;
                }
                f.write_str(")")
            }
            DataType::AggregateFunction => write!(
                f,
                "AggregateFunction({}, {})",
                self.function.as_deref().unwrap_or(""),
                self.children[0]
            ),
            _ => f.write_str(self.data_type.name()),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nullable {
            f.write_str("Nullable(")?;
            self.fmt_inner(f)?;
            f.write_str(")")
        } else {
            self.fmt_inner(f)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_column() {
        let col = Column::new("id", DataType::Int32);
        assert_eq!(col.name(), "id");
        assert_eq!(col.data_type(), DataType::Int32);
        assert!(!col.is_nullable());
        assert_eq!(col.type_string(), "Int32");
    }

    #[test]
    fn nullable_scalar_renders_wrapper() {
        let col = Column::new("name", DataType::String).nullable().unwrap();
        assert!(col.is_nullable());
        assert_eq!(col.type_string(), "Nullable(String)");
    }

    #[test]
    fn nullable_composite_is_rejected() {
        let arr = Column::array("xs", Column::new("", DataType::Int32));
        assert!(arr.nullable().is_err());
    }

    #[test]
    fn array_tracks_base_and_depth() {
        let inner = Column::array("", Column::new("", DataType::Int32));
        let outer = Column::array("xs", inner);
        assert_eq!(outer.array_base(), Some(DataType::Int32));
        assert_eq!(outer.array_depth(), 2);
        assert_eq!(outer.type_string(), "Array(Array(Int32))");
    }

    #[test]
    fn enum_table_resolves_both_directions() {
        let col = Column::enum8(
            "status",
            vec![("ok".to_string(), 1), ("err".to_string(), 2)],
        );
        let table = col.enum_table().unwrap();
        assert_eq!(table.name_of(1), Some("ok"));
        assert_eq!(table.name_of(3), None);
        assert_eq!(table.code_of("err"), Some(2));
        assert_eq!(col.type_string(), "Enum8('ok' = 1, 'err' = 2)");
    }

    #[test]
    fn decimal_renders_precision_and_scale() {
        let col = Column::decimal("price", 19, 15);
        assert_eq!(col.type_string(), "Decimal(19, 15)");
        let col = Column::decimal_sized("price", DataType::Decimal64, 4);
        assert_eq!(col.type_string(), "Decimal64(4)");
        assert_eq!(col.precision(), Some(18));
    }

    #[test]
    fn datetime64_renders_scale_and_zone() {
        let col = Column::datetime64("ts", 3, Some(chrono_tz::Tz::Asia__Tokyo));
        assert_eq!(col.type_string(), "DateTime64(3, 'Asia/Tokyo')");
    }

    #[test]
    fn map_and_tuple_render_children() {
        let map = Column::map(
            "m",
            Column::new("", DataType::String),
            Column::new("", DataType::Int32),
        );
        assert_eq!(map.type_string(), "Map(String, Int32)");

        let tup = Column::tuple(
            "t",
            vec![
                Column::new("", DataType::Int32),
                Column::new("", DataType::String),
            ],
        );
        assert_eq!(tup.type_string(), "Tuple(Int32, String)");
    }

    #[test]
    fn aggregate_function_renders_inner() {
        let col = Column::aggregate_function(
            "bits",
            "groupBitmap",
            Column::new("", DataType::UInt32),
        );
        assert_eq!(col.type_string(), "AggregateFunction(groupBitmap, UInt32)");
        assert_eq!(col.function(), Some("groupBitmap"));
    }
}
