//! # Row Streaming
//!
//! The layer that turns the per-column codec into whole-row traffic: an
//! ordered [`Schema`] drives a [`RowReader`] or [`RowWriter`] across a
//! byte stream, producing or consuming one [`Record`] per row.
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`schema`] | ordered column lists and case-insensitive lookup |
//! | [`record`] | one decoded row, positional and by-name access |
//! | [`reader`] | the streaming state machine and header parsing |
//! | [`writer`] | row encoding and header rendering |

pub mod reader;
pub mod record;
pub mod schema;
pub mod writer;

pub use reader::RowReader;
pub use record::Record;
pub use schema::Schema;
pub use writer::RowWriter;

#[cfg(test)]
mod tests;
