//! # Ordered Column Schemas
//!
//! A `Schema` is the ordered column list a row reader or writer drives
//! the codec with. Name lookup is case-insensitive and requires exactly
//! one match; zero matches and multiple matches are distinct errors.

use crate::error::{Error, Result};
use crate::types::Column;

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Schema with no columns, modeling an empty result set.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Case-insensitive name lookup. Exactly one match is required:
    /// no match fails with `NoSuchColumn`, more than one with
    /// `AmbiguousColumn`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        let mut found = None;
        for (idx, column) in self.columns.iter().enumerate() {
            if column.name().eq_ignore_ascii_case(name) {
                if found.is_some() {
                    return Err(Error::AmbiguousColumn(name.to_string()));
                }
                found = Some(idx);
            }
        }
        found.ok_or_else(|| Error::NoSuchColumn(name.to_string()))
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<T: IntoIterator<Item = Column>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
