//! # Type-Driven Dispatch
//!
//! The per-column encode/decode engine. Dispatch is a single exhaustive
//! `match` over [`DataType`](crate::types::DataType) in each direction,
//! so the compiler proves every type tag has both procedures; there is
//! no runtime registry to build or poison.
//!
//! Composite procedures recurse through the same entry points for their
//! element and field columns, bounded by the schema's declared nesting
//! depth.
//!
//! | Entry point | Direction |
//! |-------------|-----------|
//! | [`decode_value`] | bytes into a caller-owned `Value` slot |
//! | [`encode_value`] | a `Value` onto a byte sink |

mod decode;
mod encode;

pub use decode::decode_value;
pub use encode::encode_value;
