//! # Row Records
//!
//! One `Record` is one decoded row: the schema it was read under plus
//! one [`Value`] per column, accessible by position or by
//! case-insensitive name.

use crate::error::Result;
use crate::types::{Column, Value};
use std::sync::Arc;

use super::Schema;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Record {
    pub(crate) fn new(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.schema.column(index)
    }

    /// Case-insensitive lookup; exactly one matching column is required.
    pub fn value_by_name(&self, name: &str) -> Result<&Value> {
        let index = self.schema.index_of(name)?;
        Ok(&self.values[index])
    }

    /// Consumes the record, handing the values back for retention.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub(crate) fn replace_values(&mut self, values: Vec<Value>) -> Vec<Value> {
        std::mem::replace(&mut self.values, values)
    }
}
