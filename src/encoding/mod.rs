//! # Wire Primitive Codecs
//!
//! The byte-level building blocks every column codec is assembled from.
//! Nothing here knows about columns or rows; each submodule encodes one
//! primitive shape against the [`ByteInput`](crate::io::ByteInput) and
//! [`ByteOutput`](crate::io::ByteOutput) traits.
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`varint`] | LEB128 length and count prefixes |
//! | [`primitive`] | fixed-width LE integers and floats, 256-bit wide integers |
//! | [`decimal`] | scaled-integer decimal formatting, parsing and rescaling |
//! | [`bitmap`] | `groupBitmap` aggregate state (small-set and Roaring forms) |

pub mod bitmap;
pub mod decimal;
pub mod primitive;
pub mod varint;
