//! # Type System
//!
//! The column metadata and value model the codec dispatches on.
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`data_type`] | the fieldless tag enum covering every supported type |
//! | [`column`] | immutable per-column descriptors and enum tables |
//! | [`parse`] | the type-descriptor string parser (`"Map(String, Int32)"`) |
//! | [`value`] | the typed, mutable cell representation and conversions |

pub mod column;
pub mod data_type;
pub mod parse;
pub mod value;

pub use column::{Column, EnumTable};
pub use data_type::DataType;
pub use parse::parse_descriptor;
pub use value::{Array, Value};
